//! The storefront snapshot converges on the gateway under random admin edits.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use proptest::prelude::*;
use queens_beauty_core::ProductId;
use queens_beauty_integration_tests::{admin, form, seeded_gateway, store, wait_for};

#[derive(Debug, Clone)]
enum AdminOp {
    Add(String, u32),
    Reprice(i64, u32),
    Delete(i64),
}

fn admin_op() -> impl Strategy<Value = AdminOp> {
    prop_oneof![
        ("[a-z]{3,10}", 0u32..5_000).prop_map(|(name, price)| AdminOp::Add(name, price)),
        (1i64..12, 0u32..5_000).prop_map(|(id, price)| AdminOp::Reprice(id, price)),
        (1i64..12).prop_map(AdminOp::Delete),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_snapshot_converges(ops in prop::collection::vec(admin_op(), 1..20)) {
        let converged = runtime().block_on(async {
            let gateway = seeded_gateway(&[("Rose Oil", 450), ("Shea Butter", 800)]);
            let store = store(&gateway).await;
            let mut snapshots = store.watch();
            let _sync = store.spawn_sync(None);
            let mut console = admin(&gateway).await;

            for op in ops {
                // Rejected edits (unknown ids, duplicates) leave the table alone
                let _ = match op {
                    AdminOp::Add(name, price) => console
                        .create(&form(&name, "Generated", &price.to_string()), None)
                        .await
                        .map(|_| ()),
                    AdminOp::Reprice(id, price) => {
                        let id = ProductId::new(id);
                        match console.open_editor(id).map(|session| session.form.clone()) {
                            Ok(mut edited) => {
                                edited.price = price.to_string();
                                console.update(id, &edited, None).await.map(|_| ())
                            }
                            Err(e) => Err(e),
                        }
                    }
                    AdminOp::Delete(id) => console.delete(ProductId::new(id)).await,
                };
            }

            let expected = gateway.products();
            wait_for(&mut snapshots, Duration::from_secs(5), |products| {
                products == expected.as_slice()
            })
            .await
        });
        prop_assert!(converged);
    }
}
