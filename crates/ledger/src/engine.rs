//! Pure ledger arithmetic: how a movement changes a product's stock.
//!
//! Nothing here touches storage. The engine plans a change; committing the
//! movement record and the stock update as one atomic unit is the store's
//! responsibility.

use depot_core::{DomainError, DomainResult};

use crate::movement::MovementKind;

/// Note attached to the movement synthesized when a product is created with
/// non-zero initial stock.
pub const INITIAL_STOCK_NOTE: &str = "initial stock";

/// Note attached to movements synthesized from direct stock edits.
pub const ADJUSTMENT_NOTE: &str = "stock adjustment";

/// Outcome of planning a movement against the current stock level.
///
/// `previous_stock` is carried so the store can commit with a
/// compare-and-swap: the update only applies if the counter still holds the
/// value the plan was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub previous_stock: i64,
    pub new_stock: i64,
}

/// Plan a movement of `quantity` units against `current_stock`.
///
/// Rejects non-positive quantities and exits that would drive the counter
/// below zero.
pub fn plan_movement(
    current_stock: i64,
    kind: MovementKind,
    quantity: i64,
) -> DomainResult<StockChange> {
    if quantity <= 0 {
        return Err(DomainError::invalid_quantity(quantity));
    }

    let new_stock = match kind {
        MovementKind::Entry => current_stock + quantity,
        MovementKind::Exit => {
            let remaining = current_stock - quantity;
            if remaining < 0 {
                return Err(DomainError::insufficient_stock(current_stock, quantity));
            }
            remaining
        }
    };

    Ok(StockChange {
        previous_stock: current_stock,
        new_stock,
    })
}

/// Kind and quantity of the movement synthesized by a direct stock edit.
///
/// The delta between the old and new counter becomes an entry (positive) or
/// an exit (negative); a zero delta synthesizes nothing.
pub fn adjustment(old_stock: i64, new_stock: i64) -> Option<(MovementKind, i64)> {
    let delta = new_stock - old_stock;
    if delta == 0 {
        return None;
    }
    let kind = if delta > 0 {
        MovementKind::Entry
    } else {
        MovementKind::Exit
    };
    Some((kind, delta.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn entry_increases_stock() {
        let change = plan_movement(10, MovementKind::Entry, 7).unwrap();
        assert_eq!(change.previous_stock, 10);
        assert_eq!(change.new_stock, 17);
    }

    #[test]
    fn exit_decreases_stock() {
        let change = plan_movement(10, MovementKind::Exit, 4).unwrap();
        assert_eq!(change.new_stock, 6);
    }

    #[test]
    fn exit_to_exactly_zero_is_allowed() {
        let change = plan_movement(10, MovementKind::Exit, 10).unwrap();
        assert_eq!(change.new_stock, 0);
    }

    #[test]
    fn exit_below_zero_is_rejected() {
        let err = plan_movement(10, MovementKind::Exit, 15).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                available: 10,
                requested: 15
            }
        );
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert_eq!(
            plan_movement(10, MovementKind::Entry, 0).unwrap_err(),
            DomainError::InvalidQuantity(0)
        );
        assert_eq!(
            plan_movement(10, MovementKind::Exit, -3).unwrap_err(),
            DomainError::InvalidQuantity(-3)
        );
    }

    #[test]
    fn adjustment_maps_delta_sign_to_kind() {
        assert_eq!(adjustment(5, 12), Some((MovementKind::Entry, 7)));
        assert_eq!(adjustment(12, 5), Some((MovementKind::Exit, 7)));
        assert_eq!(adjustment(8, 8), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any sequence of planned movements applied in order,
        /// the final stock equals the net sum of entries minus exits.
        #[test]
        fn final_stock_equals_net_sum_of_movements(
            steps in prop::collection::vec((prop::bool::ANY, 1i64..1_000i64), 0..50)
        ) {
            let mut stock: i64 = 0;
            let mut net: i64 = 0;

            for (is_entry, quantity) in steps {
                let kind = if is_entry { MovementKind::Entry } else { MovementKind::Exit };
                match plan_movement(stock, kind, quantity) {
                    Ok(change) => {
                        stock = change.new_stock;
                        net += match kind {
                            MovementKind::Entry => quantity,
                            MovementKind::Exit => -quantity,
                        };
                    }
                    Err(DomainError::InsufficientStock { .. }) => {
                        // Rejected exits leave the counter untouched.
                        prop_assert!(!is_entry);
                        prop_assert!(quantity > stock);
                    }
                    Err(e) => prop_assert!(false, "unexpected error: {e}"),
                }
            }

            prop_assert_eq!(stock, net);
            prop_assert!(stock >= 0);
        }
    }
}
