use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use zonn_identity::{IdentityRegistry, TxContext};
use zonn_storage::MemoryStorage;
use zonn_types::{Profile, ProfileId, WalletAddress, ADDRESS_BYTES};

/// Small address pool so random operations collide often.
const POOL: u8 = 6;

fn addr(byte: u8) -> String {
    WalletAddress::from_bytes(&[byte; ADDRESS_BYTES]).to_string()
}

#[derive(Debug, Clone)]
enum Op {
    Create { caller: u8, username: String },
    Link { caller: u8, target: u8, wallet: u8 },
    Update { caller: u8, target: u8, username: Option<String> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL, "[a-z]{0,40}").prop_map(|(caller, username)| Op::Create { caller, username }),
        (0..POOL, 0..POOL, 0..POOL).prop_map(|(caller, target, wallet)| Op::Link {
            caller,
            target,
            wallet
        }),
        (0..POOL, 0..POOL, proptest::option::of("[a-z]{0,40}"))
            .prop_map(|(caller, target, username)| Op::Update {
                caller,
                target,
                username
            }),
    ]
}

/// Resolve the profile id created by `owner`, if any.
fn profile_of(registry: &IdentityRegistry<MemoryStorage>, owner: u8) -> ProfileId {
    registry
        .get_profile_by_wallet(&addr(owner))
        .map(|p| p.profile_id)
        .unwrap_or_else(|_| ProfileId::new(format!("missing-{owner}")))
}

fn check_uniqueness(profiles: &[Profile]) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for profile in profiles {
        for address in profile.addresses() {
            prop_assert!(
                seen.insert(address.clone()),
                "address {} appears twice",
                address
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn registry_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let registry = IdentityRegistry::new(MemoryStorage::new());
        let mut snapshots: BTreeMap<ProfileId, Profile> = BTreeMap::new();

        for (step, op) in ops.into_iter().enumerate() {
            // Time moves backwards every few steps to exercise clamping
            let now = if step % 3 == 0 { 10 } else { 100 + step as u64 };
            match op {
                Op::Create { caller, username } => {
                    let _ = registry.create_profile(&TxContext::new(addr(caller), now), &username, "");
                }
                Op::Link { caller, target, wallet } => {
                    let id = profile_of(&registry, target);
                    let _ = registry.link_wallet(&TxContext::new(addr(caller), now), &id, &addr(wallet));
                }
                Op::Update { caller, target, username } => {
                    let id = profile_of(&registry, target);
                    let _ = registry.update_profile(
                        &TxContext::new(addr(caller), now),
                        &id,
                        username.as_deref(),
                        None,
                    );
                }
            }

            let profiles = registry.list_profiles().unwrap();
            check_uniqueness(&profiles)?;

            for profile in &profiles {
                // Index agrees with every address the profile claims
                for address in profile.addresses() {
                    let owner = registry.get_profile_by_wallet(address.as_str()).unwrap();
                    prop_assert_eq!(&owner.profile_id, &profile.profile_id);
                }
                prop_assert!(profile.updated_at >= profile.created_at);
                if let Some(name) = &profile.username {
                    prop_assert!(name.chars().count() <= 32);
                }

                if let Some(prev) = snapshots.get(&profile.profile_id) {
                    prop_assert_eq!(&prev.primary_address, &profile.primary_address);
                    prop_assert_eq!(prev.created_at, profile.created_at);
                    prop_assert!(profile.updated_at >= prev.updated_at);
                    let prev_linked = prev.linked_addresses().as_slice();
                    prop_assert!(profile.linked_addresses().len() >= prev_linked.len());
                    prop_assert_eq!(
                        &profile.linked_addresses().as_slice()[..prev_linked.len()],
                        prev_linked
                    );
                }
            }

            // Profiles are never deleted
            prop_assert!(profiles.len() >= snapshots.len());
            snapshots = profiles.into_iter().map(|p| (p.profile_id.clone(), p)).collect();
        }

        let first = registry.list_profiles().unwrap();
        let second = registry.list_profiles().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn genesis_export_import_is_identity(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let source = IdentityRegistry::new(MemoryStorage::new());
        for op in ops {
            match op {
                Op::Create { caller, username } => {
                    let _ = source.create_profile(&TxContext::new(addr(caller), 1), &username, "");
                }
                Op::Link { caller, target, wallet } => {
                    let id = profile_of(&source, target);
                    let _ = source.link_wallet(&TxContext::new(addr(caller), 2), &id, &addr(wallet));
                }
                Op::Update { .. } => {}
            }
        }

        let exported = source.export_genesis().unwrap();
        prop_assert!(exported.validate().is_ok());

        let restored = IdentityRegistry::new(MemoryStorage::new());
        restored.init_genesis(exported.clone()).unwrap();
        prop_assert_eq!(restored.export_genesis().unwrap(), exported);

        for byte in 0..POOL {
            let left = source.get_profile_by_wallet(&addr(byte)).ok();
            let right = restored.get_profile_by_wallet(&addr(byte)).ok();
            prop_assert_eq!(left, right);
        }
    }
}
