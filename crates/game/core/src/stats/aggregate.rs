//! Folding allocated passive nodes into a [`BonusBundle`].

use crate::definitions::PassiveNodeSpec;
use crate::effects::NodeModifier;

use super::BonusBundle;

/// Folds passive node modifiers into one bundle.
///
/// Every rule is commutative, so node order never changes the result.
/// Malformed authored fields were dropped when the nodes were parsed, which
/// leaves nothing here that can fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct BonusAggregator;

impl BonusAggregator {
    pub fn aggregate<'a>(nodes: impl IntoIterator<Item = &'a PassiveNodeSpec>) -> BonusBundle {
        Self::aggregate_modifiers(nodes.into_iter().flat_map(|node| node.modifiers.iter()))
    }

    pub fn aggregate_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a NodeModifier>) -> BonusBundle {
        modifiers
            .into_iter()
            .fold(BonusBundle::neutral(), |mut bundle, modifier| {
                bundle.apply(modifier);
                bundle
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::NodeTier;
    use crate::effects::{AdditiveStat, MultiplicativeStat, ThresholdKind};
    use crate::stats::WeaponCategory;

    fn node(id: &str, modifiers: Vec<NodeModifier>) -> PassiveNodeSpec {
        PassiveNodeSpec {
            id: id.to_owned(),
            name: id.to_owned(),
            tier: NodeTier::Minor,
            required_level: 1,
            prerequisites: Vec::new(),
            modifiers,
        }
    }

    fn sample_nodes() -> Vec<PassiveNodeSpec> {
        vec![
            node(
                "N01",
                vec![NodeModifier::Add {
                    stat: AdditiveStat::IncreasedDamage,
                    value: 0.05,
                }],
            ),
            node(
                "N02",
                vec![NodeModifier::WeaponDamage {
                    weapon: WeaponCategory::Dagger,
                    value: 0.08,
                }],
            ),
            node(
                "N03",
                vec![NodeModifier::Multiply {
                    stat: MultiplicativeStat::FirstSkillManaCostMult,
                    factor: 0.8,
                }],
            ),
            node(
                "N04",
                vec![
                    NodeModifier::Multiply {
                        stat: MultiplicativeStat::FirstSkillManaCostMult,
                        factor: 0.5,
                    },
                    NodeModifier::Add {
                        stat: AdditiveStat::IncreasedDamage,
                        value: 0.10,
                    },
                ],
            ),
            node(
                "N05",
                vec![
                    NodeModifier::Multiply {
                        stat: MultiplicativeStat::ExecutionWindowMult,
                        factor: 1.06,
                    },
                    NodeModifier::Threshold {
                        kind: ThresholdKind::Execution,
                        value: 0.35,
                    },
                ],
            ),
        ]
    }

    #[test]
    fn additive_and_multiplicative_rules() {
        let bundle = BonusAggregator::aggregate(&sample_nodes());
        assert!((bundle.additive(AdditiveStat::IncreasedDamage) - 0.15).abs() < 1e-12);
        assert!((bundle.factor(MultiplicativeStat::FirstSkillManaCostMult) - 0.4).abs() < 1e-12);
        assert!((bundle.weapon_damage(WeaponCategory::Dagger) - 0.08).abs() < 1e-12);
        assert_eq!(bundle.weapon_damage(WeaponCategory::Bow), 0.0);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = BonusAggregator::aggregate(&sample_nodes());
        let mut reversed_nodes = sample_nodes();
        reversed_nodes.reverse();
        let reversed = BonusAggregator::aggregate(&reversed_nodes);

        for stat in [AdditiveStat::IncreasedDamage, AdditiveStat::InitiativeFlat] {
            assert!((forward.additive(stat) - reversed.additive(stat)).abs() < 1e-12);
        }
        assert!(
            (forward.factor(MultiplicativeStat::FirstSkillManaCostMult)
                - reversed.factor(MultiplicativeStat::FirstSkillManaCostMult))
            .abs()
                < 1e-12
        );
    }

    #[test]
    fn empty_input_is_neutral() {
        let bundle = BonusAggregator::aggregate(&Vec::<PassiveNodeSpec>::new());
        assert_eq!(bundle, BonusBundle::neutral());
    }
}
