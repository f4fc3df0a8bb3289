//! Cross-tenant identity properties over the bundled catalog.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::HashSet;

use demo_catalog::{ArchetypeCatalog, ArchetypeTemplate, IdentityKind, synthetic_identity};
use rstest::{fixture, rstest};
use uuid::Uuid;

#[fixture]
fn catalog() -> ArchetypeCatalog {
    ArchetypeCatalog::bundled().expect("bundled catalog is valid")
}

fn identities_for(catalog: &ArchetypeCatalog, tenant: Uuid) -> HashSet<String> {
    let expand = |templates: &[ArchetypeTemplate], kind: IdentityKind| {
        templates
            .iter()
            .enumerate()
            .map(move |(index, template)| {
                synthetic_identity(template.base_identity(), tenant, kind, index)
            })
            .collect::<Vec<_>>()
    };
    expand(catalog.clients(), IdentityKind::Client)
        .into_iter()
        .chain(expand(catalog.staff(), IdentityKind::Staff))
        .collect()
}

#[rstest]
fn every_catalog_entry_gets_a_distinct_identity(catalog: ArchetypeCatalog) {
    let identities = identities_for(&catalog, Uuid::new_v4());
    assert_eq!(
        identities.len(),
        catalog.clients().len() + catalog.staff().len()
    );
}

#[rstest]
fn reprovisioning_proposes_the_same_identities(catalog: ArchetypeCatalog) {
    let tenant = Uuid::new_v4();
    assert_eq!(identities_for(&catalog, tenant), identities_for(&catalog, tenant));
}

#[rstest]
#[case(Uuid::from_u128(1), Uuid::from_u128(2))]
#[case(Uuid::from_u128(u128::MAX), Uuid::from_u128(u128::MAX - 1))]
#[case(Uuid::nil(), Uuid::from_u128(0xffff_0000))]
fn distinct_tenants_never_share_identities(
    catalog: ArchetypeCatalog,
    #[case] first: Uuid,
    #[case] second: Uuid,
) {
    let left = identities_for(&catalog, first);
    let right = identities_for(&catalog, second);
    assert!(left.is_disjoint(&right));
}

#[rstest]
fn many_random_tenants_stay_disjoint(catalog: ArchetypeCatalog) {
    let mut seen = HashSet::new();
    for _ in 0..40 {
        for identity in identities_for(&catalog, Uuid::new_v4()) {
            assert!(seen.insert(identity.clone()), "collision on {identity}");
        }
    }
}

#[rstest]
#[case(1)]
#[case(25)]
#[case(500)]
fn large_catalogs_stay_disjoint_across_tenants(#[case] size: usize) {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let build = |tenant| -> HashSet<String> {
        (0..size)
            .map(|index| synthetic_identity("repeat@example.com", tenant, IdentityKind::Client, index))
            .collect()
    };
    let left = build(first);
    let right = build(second);
    assert_eq!(left.len(), size);
    assert!(left.is_disjoint(&right));
}
