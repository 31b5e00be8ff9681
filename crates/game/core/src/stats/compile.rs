//! Build → snapshot compilation.
//!
//! The compiler runs a fixed sequence of steps. Later steps read the output
//! of earlier ones, so the order matters:
//!
//! 1. wound penalty on raw attributes
//! 2. max HP / mana from race base and attributes
//! 3. item "increased" multipliers
//! 4. item max HP / mana percentages
//! 5. damage per category
//! 6. armor, evasion and ward
//! 7. accuracy, crit and block
//! 8. resistances
//! 9. initiative and armor penetration
//! 10. passive bonus bundle, recomputing every figure it touches
//! 11. racial traits
//! 12. current HP / mana set to max
//! 13. flat elemental add-ons from the weapon

use crate::combat::StatusEffects;
use crate::config::CombatConfig;
use crate::effects::{AdditiveStat, MultiplicativeStat};
use crate::env::{RaceKind, RaceOracle};
use crate::error::{ErrorSeverity, GameError};

use super::{
    AffixKind, Attributes, BonusAggregator, BonusBundle, BuildRequest, CharacterSnapshot,
    DamageFigures, Equipment, FlatElemental, IncreasedMultipliers, RacialTraits, Resistances,
    Slot,
};

/// Stat compilation failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("no race definition for {race}")]
    MissingDefinition { race: RaceKind },
}

impl GameError for CompileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDefinition { .. } => "COMPILE_MISSING_DEFINITION",
        }
    }
}

/// Compiles builds into combat-ready snapshots.
///
/// Compilation is a pure function of the build, the race table and the
/// configuration: the same inputs always produce a bit-identical snapshot.
pub struct StatCompiler<'a, O: RaceOracle + ?Sized> {
    config: &'a CombatConfig,
    races: &'a O,
}

impl<'a, O: RaceOracle + ?Sized> StatCompiler<'a, O> {
    pub fn new(config: &'a CombatConfig, races: &'a O) -> Self {
        Self { config, races }
    }

    pub fn compile(&self, build: &BuildRequest) -> Result<CharacterSnapshot, CompileError> {
        let race = self
            .races
            .race(build.race)
            .ok_or(CompileError::MissingDefinition { race: build.race })?;
        let mut racial = RacialTraits::for_race(build.race);
        let bonuses = BonusAggregator::aggregate(&build.passives);
        let equipment = &build.equipment;
        let params = &self.config.attributes;
        let caps = &self.config.caps;

        // 1. wound
        let attributes = if build.wounded && !racial.is_wound_immune() {
            build.attributes.scaled(params.wound_multiplier)
        } else {
            build.attributes
        };

        // 2. resource pools
        let mut max_hp = (race.base_hp
            + f64::from(attributes.strength) * params.hp_per_strength
            + f64::from(attributes.vitality) * params.hp_per_vitality)
            .floor();
        let mut max_mana = (race.base_mana
            + f64::from(attributes.intelligence) * params.mana_per_intelligence
            + f64::from(attributes.wisdom) * params.mana_per_wisdom)
            .floor();

        // 3. item increased multipliers; defence affixes on the base slot are
        //    applied in step 6 and must not count twice
        let mut increased = IncreasedMultipliers::default();
        increased.damage += equipment.affix_total(AffixKind::DamagePct);
        increased.armor += equipment.affix_total_outside(&[Slot::Armor], AffixKind::ArmorPct);
        increased.evasion += equipment.affix_total_outside(&[Slot::Armor], AffixKind::EvasionPct);
        increased.ward +=
            equipment.affix_total_outside(&[Slot::Armor, Slot::Offhand], AffixKind::WardPct);

        // 4. item pool percentages
        max_hp = (max_hp * (1.0 + equipment.affix_total(AffixKind::MaxHpPct))).floor();
        max_mana = (max_mana * (1.0 + equipment.affix_total(AffixKind::MaxManaPct))).floor();

        // 5. damage
        let weapon = equipment.weapon_category();
        let weapon_base_damage = equipment
            .weapon
            .as_ref()
            .map_or(self.config.damage.bare_hand_damage, |item| item.base.damage);
        let mut damage = self.damage_figures(&attributes, weapon_base_damage, increased.damage);

        // 6. defences
        let mut defences = self.defences(&attributes, equipment, &increased);

        // 7. hit, crit, block
        let mut accuracy = self.accuracy(&attributes, equipment, increased.accuracy, 1.0);
        let mut crit_chance = self.crit_chance(&attributes, equipment, increased.crit_chance, 0.0);
        let mut crit_multiplier = (caps.base_crit_multiplier
            + equipment.affix_total(AffixKind::CritMultiFlat))
        .min(caps.crit_multiplier_cap);
        let mut block_chance_cap = caps.block_chance_cap;
        let mut block_chance =
            self.block_chance(&attributes, equipment, increased.block_chance, block_chance_cap);

        // 8. resistances
        let resist_all = equipment.affix_total(AffixKind::ResistAll);
        let resistances = Resistances::new(
            race.resistances.fire + equipment.affix_total(AffixKind::ResistFire) + resist_all,
            race.resistances.cold + equipment.affix_total(AffixKind::ResistCold) + resist_all,
            race.resistances.lightning
                + equipment.affix_total(AffixKind::ResistLightning)
                + resist_all,
            race.resistances.chaos + equipment.affix_total(AffixKind::ResistChaos) + resist_all,
        )
        .clamped(caps.resistance_min, caps.resistance_max);

        // 9. initiative and penetration
        let speed = equipment
            .weapon
            .as_ref()
            .map_or(self.config.damage.bare_hand_speed, |item| item.base.attack_speed);
        let mut initiative = speed * (1.0 + equipment.affix_total(AffixKind::AttackSpeedPct))
            + f64::from(attributes.agility) * params.initiative_per_agility
            + equipment.affix_total(AffixKind::InitiativeFlat);
        let mut armor_penetration = equipment.affix_total(AffixKind::ArmorPenPct);

        // 10. passive bundle
        max_hp = (max_hp * (1.0 + bonuses.additive(AdditiveStat::MaxHpPercent))).floor();
        max_mana = (max_mana * (1.0 + bonuses.additive(AdditiveStat::MaxManaPercent))).floor();
        initiative += bonuses.additive(AdditiveStat::InitiativeFlat);

        increased.damage += bonuses.additive(AdditiveStat::IncreasedDamage)
            + weapon.map_or(0.0, |weapon| bonuses.weapon_damage(weapon));
        damage = self.damage_figures(&attributes, weapon_base_damage, increased.damage);

        increased.accuracy += bonuses.additive(AdditiveStat::IncreasedAccuracy);
        accuracy = self.accuracy(
            &attributes,
            equipment,
            increased.accuracy,
            bonuses.factor(MultiplicativeStat::AccuracyMult),
        );

        crit_chance = self.crit_chance(
            &attributes,
            equipment,
            increased.crit_chance,
            bonuses.additive(AdditiveStat::CritChanceFlat),
        );
        crit_multiplier = (crit_multiplier * bonuses.factor(MultiplicativeStat::CritMultiplierMult))
            .min(caps.crit_multiplier_cap);

        increased.armor += bonuses.additive(AdditiveStat::IncreasedArmor);
        increased.evasion += bonuses.additive(AdditiveStat::IncreasedEvasion);
        increased.ward += bonuses.additive(AdditiveStat::IncreasedWard);
        defences = self.defences(&attributes, equipment, &increased);

        increased.block_chance += bonuses.additive(AdditiveStat::IncreasedBlockChance);
        block_chance_cap += bonuses.block_cap_bonus();
        block_chance =
            self.block_chance(&attributes, equipment, increased.block_chance, block_chance_cap);

        armor_penetration =
            (armor_penetration + bonuses.additive(AdditiveStat::ArmorPenetration)).clamp(0.0, 1.0);
        let lifesteal = bonuses.additive(AdditiveStat::Lifesteal);

        let mut snapshot = CharacterSnapshot {
            current_hp: 0.0,
            max_hp,
            current_mana: 0.0,
            max_mana,
            attributes,
            damage,
            weapon,
            weapon_base_damage,
            armor: defences.armor,
            evasion: defences.evasion,
            ward: defences.ward,
            accuracy,
            crit_chance,
            crit_chance_cap: caps.crit_chance_cap,
            crit_multiplier,
            crit_multiplier_cap: caps.crit_multiplier_cap,
            block_chance,
            block_chance_cap,
            block_reduction: self.config.damage.block_reduction,
            resistances,
            resistance_range: (caps.resistance_min, caps.resistance_max),
            initiative,
            increased,
            armor_penetration,
            lifesteal,
            flat_elemental: FlatElemental::default(),
            racial,
            bonuses: BonusBundle::neutral(),
            status: StatusEffects::new(),
        };

        // 11. racial traits
        let bloodlust = racial.apply(&mut snapshot, build.last_win_was_pvp, self.config);
        if bloodlust > 0.0 {
            snapshot.increased.damage += bloodlust;
            snapshot.damage =
                self.damage_figures(&attributes, weapon_base_damage, snapshot.increased.damage);
        }
        snapshot.racial = racial;

        // 12. fill pools
        snapshot.current_hp = snapshot.max_hp;
        snapshot.current_mana = snapshot.max_mana;

        // 13. weapon flat elemental
        if let Some(item) = equipment.weapon.as_ref() {
            snapshot.flat_elemental = FlatElemental {
                fire: item.affix_total(AffixKind::FlatFireDamage),
                cold: item.affix_total(AffixKind::FlatColdDamage),
                lightning: item.affix_total(AffixKind::FlatLightningDamage),
                chaos: item.affix_total(AffixKind::FlatChaosDamage),
            };
        }

        snapshot.bonuses = bonuses;

        tracing::trace!(
            race = %build.race,
            level = build.level,
            max_hp = snapshot.max_hp,
            melee = snapshot.damage.melee,
            armor = snapshot.armor,
            "compiled snapshot"
        );

        Ok(snapshot)
    }

    fn damage_figures(
        &self,
        attributes: &Attributes,
        weapon_base: f64,
        increased_damage: f64,
    ) -> DamageFigures {
        let per_point = self.config.attributes.damage_per_point;
        let scaled = |points: i32| (weapon_base + f64::from(points) * per_point) * increased_damage;
        DamageFigures {
            melee: scaled(attributes.strength),
            ranged: scaled(attributes.dexterity),
            spell: scaled(attributes.intelligence),
        }
    }

    fn defences(
        &self,
        attributes: &Attributes,
        equipment: &Equipment,
        increased: &IncreasedMultipliers,
    ) -> Defences {
        let params = &self.config.attributes;
        let above_floor = |points: i32| f64::from((points - params.defence_attribute_floor).max(0));

        let armor = (equipment.base(Slot::Armor, |base| base.armor)
            + above_floor(attributes.vitality) * params.armor_per_vitality)
            * (1.0 + equipment.affix_total_in(&[Slot::Armor], AffixKind::ArmorPct))
            * increased.armor;
        let evasion = (equipment.base(Slot::Armor, |base| base.evasion)
            + above_floor(attributes.agility) * params.evasion_per_agility)
            * (1.0 + equipment.affix_total_in(&[Slot::Armor], AffixKind::EvasionPct))
            * increased.evasion;
        let ward = (equipment.base(Slot::Armor, |base| base.ward)
            + equipment.base(Slot::Offhand, |base| base.ward)
            + above_floor(attributes.wisdom) * params.ward_per_wisdom)
            * (1.0 + equipment.affix_total_in(&[Slot::Armor, Slot::Offhand], AffixKind::WardPct))
            * increased.ward;

        Defences {
            armor: armor.max(0.0),
            evasion: evasion.max(0.0),
            ward: ward.max(0.0),
        }
    }

    fn accuracy(
        &self,
        attributes: &Attributes,
        equipment: &Equipment,
        increased: f64,
        mult: f64,
    ) -> f64 {
        let params = &self.config.attributes;
        (params.base_accuracy + f64::from(attributes.dexterity) * params.accuracy_per_dexterity)
            * (1.0 + equipment.affix_total(AffixKind::AccuracyPct))
            * increased
            * mult
    }

    fn crit_chance(
        &self,
        attributes: &Attributes,
        equipment: &Equipment,
        increased: f64,
        passive_flat: f64,
    ) -> f64 {
        let caps = &self.config.caps;
        ((caps.base_crit_chance
            + f64::from(attributes.dexterity) * self.config.attributes.crit_per_dexterity
            + equipment.affix_total(AffixKind::CritChanceFlat)
            + passive_flat)
            * increased)
            .clamp(0.0, caps.crit_chance_cap)
    }

    fn block_chance(
        &self,
        attributes: &Attributes,
        equipment: &Equipment,
        increased: f64,
        cap: f64,
    ) -> f64 {
        ((equipment.base(Slot::Offhand, |base| base.block_chance)
            + f64::from(attributes.vitality) * self.config.attributes.block_per_vitality
            + equipment.affix_total(AffixKind::BlockChanceFlat))
            * increased)
            .clamp(0.0, cap)
    }
}

struct Defences {
    armor: f64,
    evasion: f64,
    ward: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{NodeTier, PassiveNodeSpec};
    use crate::effects::NodeModifier;
    use crate::env::RaceDefinition;
    use crate::stats::{EquippedItem, ItemBase, RolledAffix, WeaponCategory};

    fn races() -> Vec<RaceDefinition> {
        vec![
            RaceDefinition::new(RaceKind::Human, 100.0, 50.0, Resistances::default()),
            RaceDefinition::new(RaceKind::Dwarf, 120.0, 40.0, Resistances::default()),
            RaceDefinition::new(RaceKind::Orc, 110.0, 40.0, Resistances::default()),
            RaceDefinition::new(
                RaceKind::Undead,
                90.0,
                60.0,
                Resistances::new(0.0, 0.0, 0.0, 0.15),
            ),
        ]
    }

    fn node(modifiers: Vec<NodeModifier>) -> PassiveNodeSpec {
        PassiveNodeSpec {
            id: "T".to_owned(),
            name: "T".to_owned(),
            tier: NodeTier::Notable,
            required_level: 1,
            prerequisites: Vec::new(),
            modifiers,
        }
    }

    fn sword(affixes: Vec<RolledAffix>) -> EquippedItem {
        EquippedItem {
            name: "Arming Sword".to_owned(),
            weapon: Some(WeaponCategory::OneHandSword),
            base: ItemBase {
                damage: 10.0,
                attack_speed: 6.0,
                ..ItemBase::default()
            },
            affixes,
        }
    }

    fn compile(build: &BuildRequest) -> CharacterSnapshot {
        let config = CombatConfig::default();
        let races = races();
        StatCompiler::new(&config, &races)
            .compile(build)
            .expect("race is defined")
    }

    #[test]
    fn base_pools_follow_attributes() {
        let snapshot = compile(&BuildRequest::new(RaceKind::Human, 1));
        // 100 + 5*2 + 5*4
        assert_eq!(snapshot.max_hp, 130.0);
        // 50 + 5*2 + 5*4
        assert_eq!(snapshot.max_mana, 80.0);
        assert_eq!(snapshot.current_hp, snapshot.max_hp);
        // bare hands: 5 + 5*2
        assert_eq!(snapshot.damage.melee, 15.0);
        // vitality at the floor gives no armor
        assert_eq!(snapshot.armor, 0.0);
        assert_eq!(snapshot.accuracy, 110.0);
        assert_eq!(snapshot.initiative, 15.0);
    }

    #[test]
    fn wound_penalty_skips_undead() {
        let attributes = Attributes {
            strength: 20,
            vitality: 20,
            ..Attributes::default()
        };
        let mut build = BuildRequest::new(RaceKind::Human, 5).with_attributes(attributes);
        build.wounded = true;
        let human = compile(&build);
        // 19*2 + 19*4
        assert_eq!(human.max_hp, 100.0 + 38.0 + 76.0);

        build.race = RaceKind::Undead;
        let undead = compile(&build);
        assert_eq!(undead.max_hp, 90.0 + 40.0 + 80.0);
        assert!((undead.resistances.chaos - 0.30).abs() < 1e-12);
    }

    #[test]
    fn missing_race_is_fatal() {
        let config = CombatConfig::default();
        let races = races();
        let error = StatCompiler::new(&config, &races)
            .compile(&BuildRequest::new(RaceKind::Drakoid, 1))
            .unwrap_err();
        assert_eq!(error, CompileError::MissingDefinition { race: RaceKind::Drakoid });
        assert_eq!(error.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn weapon_bucket_and_affixes_raise_damage() {
        let equipment = Equipment {
            weapon: Some(sword(vec![
                RolledAffix::new(AffixKind::DamagePct, 0.10),
                RolledAffix::new(AffixKind::FlatFireDamage, 4.0),
            ])),
            ..Equipment::default()
        };
        let passives = vec![node(vec![NodeModifier::WeaponDamage {
            weapon: WeaponCategory::OneHandSword,
            value: 0.10,
        }])];
        let snapshot = compile(
            &BuildRequest::new(RaceKind::Human, 3)
                .with_equipment(equipment)
                .with_passives(passives),
        );
        // (10 + 5*2) * 1.2
        assert!((snapshot.damage.melee - 24.0).abs() < 1e-9);
        assert_eq!(snapshot.flat_elemental.fire, 4.0);
        assert_eq!(snapshot.weapon, Some(WeaponCategory::OneHandSword));
        assert_eq!(snapshot.initiative, 6.0 + 10.0);
    }

    #[test]
    fn block_cap_bonus_lifts_cap() {
        let attributes = Attributes {
            vitality: 100,
            ..Attributes::default()
        };
        let shield = EquippedItem {
            name: "Tower Shield".to_owned(),
            weapon: None,
            base: ItemBase {
                block_chance: 0.30,
                ..ItemBase::default()
            },
            affixes: vec![RolledAffix::new(AffixKind::BlockChanceFlat, 0.10)],
        };
        let equipment = Equipment {
            offhand: Some(shield),
            ..Equipment::default()
        };
        let build = BuildRequest::new(RaceKind::Human, 10)
            .with_attributes(attributes)
            .with_equipment(equipment);
        assert_eq!(compile(&build).block_chance, 0.40);

        let lifted = build.with_passives(vec![node(vec![NodeModifier::BlockCapBonus(0.05)])]);
        assert!((compile(&lifted).block_chance - 0.45).abs() < 1e-12);
    }

    #[test]
    fn racial_adjustments() {
        let attributes = Attributes {
            vitality: 15,
            ..Attributes::default()
        };
        let dwarf = compile(&BuildRequest::new(RaceKind::Dwarf, 1).with_attributes(attributes));
        // (10 * 2) * 1.05
        assert!((dwarf.armor - 21.0).abs() < 1e-9);
        assert_eq!(dwarf.racial.debuff_duration_reduction, 1);

        let mut build = BuildRequest::new(RaceKind::Orc, 1);
        let calm = compile(&build);
        build.last_win_was_pvp = true;
        let enraged = compile(&build);
        assert!((calm.lifesteal - 0.01).abs() < 1e-12);
        assert!((enraged.damage.melee - calm.damage.melee * 1.15).abs() < 1e-9);
    }

    #[test]
    fn compilation_is_deterministic() {
        let build = BuildRequest::new(RaceKind::Orc, 7).with_equipment(Equipment {
            weapon: Some(sword(vec![RolledAffix::new(AffixKind::CritChanceFlat, 0.03)])),
            ..Equipment::default()
        });
        assert_eq!(compile(&build), compile(&build));
    }
}
