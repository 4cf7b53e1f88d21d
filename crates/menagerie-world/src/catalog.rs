//! Static species, consumable and restaurant catalogs.
//!
//! Every table is immutable and keyed by a lowercase snake-case name.
//! The tick and the interaction layer read these; nothing writes them.

use menagerie_types::{CareLevel, Diet, Habitat, Position, Zone};

use CareLevel::{Easy, Hard, Legendary, Medium, VeryHard};
use Diet::{Carnivore, Herbivore, Omnivore};

// ---------------------------------------------------------------------------
// Catalog record types
// ---------------------------------------------------------------------------

/// Harvestable byproduct of a farm animal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProduceSpec {
    /// Display name.
    pub name: &'static str,
    /// Display glyph.
    pub glyph: &'static str,
    /// Coins paid per harvest.
    pub price: u64,
    /// Production progress per tick at full vitals and speed 1.
    pub base_rate: f64,
}

/// Growth data for a garden species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantSpec {
    /// Glyphs for seed, sprout and mature. Harvestable reuses the last.
    pub stages: [&'static str; 3],
    /// Regrows after harvest instead of being removed.
    pub perennial: bool,
    /// Coins paid per harvest.
    pub produce_price: u64,
}

impl PlantSpec {
    /// Glyph to show for a growth stage index (0..=3).
    pub fn glyph_for_stage(&self, stage: u8) -> &'static str {
        let [seed, sprout, mature] = self.stages;
        match stage {
            0 => seed,
            1 => sprout,
            _ => mature,
        }
    }
}

/// One purchasable species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesSpec {
    /// Catalog key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display glyph (plants use their seed glyph).
    pub glyph: &'static str,
    /// Purchase price.
    pub price: u64,
    /// Diet class; `None` for plants.
    pub diet: Option<Diet>,
    /// Home zone.
    pub zone: Zone,
    /// Shop blurb.
    pub description: &'static str,
    /// Shop difficulty hint.
    pub care: CareLevel,
    /// Farm byproduct, if any.
    pub produce: Option<ProduceSpec>,
    /// Garden growth data, if a plant.
    pub plant: Option<PlantSpec>,
}

impl SpeciesSpec {
    /// Coins credited when an entity of this species is sold: `floor(0.6 × price)`.
    pub const fn resale_value(&self) -> u64 {
        self.price.saturating_mul(3) / 5
    }

    /// The habitat this species lives in.
    pub const fn habitat(&self) -> Habitat {
        self.zone.habitat()
    }
}

/// A food or care item bought per use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumable {
    /// Catalog key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display glyph.
    pub glyph: &'static str,
    /// Cost per use.
    pub price: u64,
    /// Hunger (or hydration) boost.
    pub hunger: f64,
    /// Happiness (or health) boost.
    pub happiness: f64,
    /// Shop blurb.
    pub description: &'static str,
}

/// Whether a menu entry is eaten or drunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// A dish.
    Food,
    /// A drink.
    Drink,
}

/// One restaurant menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    /// Catalog key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display glyph.
    pub glyph: &'static str,
    /// What the customer pays.
    pub price: u64,
    /// Nominal eating time.
    pub eat_ms: u64,
    /// Food or drink.
    pub kind: MenuKind,
}

/// A kind of restaurant guest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerArchetype {
    /// Display name.
    pub name: &'static str,
    /// Display glyph.
    pub glyph: &'static str,
    /// Relative walking pace, for display.
    pub pace: f64,
}

/// A restaurant table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table {
    /// Table number.
    pub id: u8,
    /// Table center.
    pub position: Position,
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// Shorthand for a creature row.
#[allow(clippy::too_many_arguments)]
const fn creature(
    key: &'static str,
    name: &'static str,
    glyph: &'static str,
    price: u64,
    diet: Diet,
    zone: Zone,
    care: CareLevel,
    description: &'static str,
) -> SpeciesSpec {
    SpeciesSpec {
        key,
        name,
        glyph,
        price,
        diet: Some(diet),
        zone,
        description,
        care,
        produce: None,
        plant: None,
    }
}

/// Shorthand for a farm produce spec.
const fn produce(name: &'static str, glyph: &'static str, price: u64) -> Option<ProduceSpec> {
    Some(ProduceSpec {
        name,
        glyph,
        price,
        base_rate: 0.5,
    })
}

/// Shorthand for a plant row.
#[allow(clippy::too_many_arguments)]
const fn plant(
    key: &'static str,
    name: &'static str,
    price: u64,
    zone: Zone,
    care: CareLevel,
    stages: [&'static str; 3],
    perennial: bool,
    produce_price: u64,
    description: &'static str,
) -> SpeciesSpec {
    SpeciesSpec {
        key,
        name,
        glyph: stages[0],
        price,
        diet: None,
        zone,
        description,
        care,
        produce: None,
        plant: Some(PlantSpec {
            stages,
            perennial,
            produce_price,
        }),
    }
}

/// Every purchasable species.
pub static SPECIES: &[SpeciesSpec] = &[
    // --- Aquarium: coral reef ---
    creature("goldfish", "Goldfish", "🐠", 15, Herbivore, Zone::CoralReef, Easy,
        "Gentle and easy to keep, perfect for beginners."),
    creature("tropical_fish", "Tropical Fish", "🐟", 25, Herbivore, Zone::CoralReef, Easy,
        "Brightly colored, fast, and loves to swim in schools."),
    creature("crab", "Crab", "🦀", 30, Carnivore, Zone::CoralReef, Easy,
        "Scuttles sideways along the bottom, tidying up leftovers."),
    creature("pufferfish", "Pufferfish", "🐡", 60, Herbivore, Zone::CoralReef, Medium,
        "Puffs up when annoyed. Needs a special diet."),
    creature("lobster", "Lobster", "🦞", 180, Carnivore, Zone::CoralReef, Hard,
        "The armored king of the reef, very fancy."),
    // --- Aquarium: open ocean ---
    creature("sea_turtle", "Sea Turtle", "🐢", 80, Herbivore, Zone::OpenOcean, Medium,
        "Lives a long time and swims slowly and calmly."),
    creature("jellyfish", "Jellyfish", "🪼", 45, Herbivore, Zone::OpenOcean, Medium,
        "Drifts beautifully, but do not touch!"),
    creature("octopus", "Octopus", "🐙", 120, Carnivore, Zone::OpenOcean, Hard,
        "Clever and playful. Eats small fish when hungry!"),
    creature("squid", "Squid", "🦑", 140, Carnivore, Zone::OpenOcean, Hard,
        "Fast swimmer that loves to squirt ink."),
    creature("dolphin", "Dolphin", "🐬", 350, Carnivore, Zone::OpenOcean, Hard,
        "Brilliant and loves to leap and play."),
    creature("whale", "Whale", "🐳", 500, Carnivore, Zone::OpenOcean, Legendary,
        "A gentle giant with a giant appetite."),
    creature("baby_shark", "Baby Shark", "🦈", 250, Carnivore, Zone::OpenOcean, VeryHard,
        "Ocean hunter. Watch out or it will eat the whole tank!"),
    // --- Zoo: jungle ---
    creature("cat", "Cat", "🐱", 20, Herbivore, Zone::Jungle, Easy,
        "Loves naps and pets. Very tidy."),
    creature("dog", "Dog", "🐶", 20, Herbivore, Zone::Jungle, Easy,
        "Loyal, energetic, and needs playtime."),
    creature("monkey", "Monkey", "🐒", 50, Herbivore, Zone::Jungle, Medium,
        "Mischievous climber with a banana habit."),
    creature("panda", "Panda", "🐼", 120, Herbivore, Zone::Jungle, Medium,
        "Lazy but adorable. Only eats bamboo."),
    creature("giraffe", "Giraffe", "🦒", 160, Herbivore, Zone::Jungle, Hard,
        "Very long neck, sees very far."),
    creature("lion", "Lion", "🦁", 250, Carnivore, Zone::Jungle, Hard,
        "King of the jungle. Hunts when hungry."),
    creature("tiger", "Tiger", "🐯", 300, Carnivore, Zone::Jungle, Hard,
        "Strong and independent. A top predator."),
    creature("elephant", "Elephant", "🐘", 450, Herbivore, Zone::Jungle, VeryHard,
        "Smart, great memory, and very affectionate."),
    // --- Zoo: desert ---
    creature("camel", "Camel", "🐫", 80, Herbivore, Zone::Desert, Medium,
        "Expert at hot sand and can go without water."),
    creature("scorpion", "Scorpion", "🦂", 40, Carnivore, Zone::Desert, Easy,
        "Small but tough. Likes hiding under sand."),
    creature("rattlesnake", "Rattlesnake", "🐍", 60, Carnivore, Zone::Desert, Hard,
        "Dangerous and unpredictable. Warns with its rattle."),
    creature("fennec_fox", "Fennec Fox", "🦊", 100, Carnivore, Zone::Desert, Medium,
        "Big ears shed heat. Very quick at night."),
    // --- Zoo: arctic ---
    creature("polar_bear", "Polar Bear", "🐻‍❄️", 300, Carnivore, Zone::Arctic, VeryHard,
        "King of the ice with enormous strength."),
    creature("snow_fox", "Snow Fox", "🐺", 150, Carnivore, Zone::Arctic, Hard,
        "Snow-white fur makes perfect camouflage."),
    creature("seal", "Seal", "🦭", 120, Carnivore, Zone::Arctic, Medium,
        "Swims better than it walks. Loves sunbathing on ice."),
    creature("snowy_owl", "Snowy Owl", "🦉", 90, Carnivore, Zone::Arctic, Medium,
        "Hunts silently through the white night."),
    // --- Zoo: antarctic ---
    creature("penguin", "Penguin", "🐧", 90, Carnivore, Zone::Antarctic, Easy,
        "Cannot fly but swims like a torpedo."),
    creature("gull", "Gull", "🐦", 50, Carnivore, Zone::Antarctic, Easy,
        "Soars over the frozen sky."),
    creature("orca", "Orca", "🐋", 500, Carnivore, Zone::Antarctic, Legendary,
        "Apex predator of the icy ocean."),
    // --- Farm ---
    SpeciesSpec {
        produce: produce("Egg", "🥚", 5),
        ..creature("chicken", "Chicken", "🐔", 10, Omnivore, Zone::Barn, Easy,
            "Crows at dawn. Lays an egg every day.")
    },
    creature("chick", "Chick", "🐤", 5, Omnivore, Zone::Barn, Easy,
        "Tiny and peeping. Needs to be kept warm."),
    SpeciesSpec {
        produce: produce("Milk", "🥛", 15),
        ..creature("dairy_cow", "Dairy Cow", "🐮", 60, Herbivore, Zone::Field, Medium,
            "Gives delicious milk. Loves grazing.")
    },
    SpeciesSpec {
        produce: produce("Truffle", "🍄", 20),
        ..creature("pig", "Pig", "🐷", 30, Omnivore, Zone::Barn, Easy,
            "Smart and clean when bathed. Eats a lot.")
    },
    SpeciesSpec {
        produce: produce("Wool", "🧶", 12),
        ..creature("sheep", "Sheep", "🐑", 50, Herbivore, Zone::Field, Medium,
            "Warm fleece. Gentle and follows the flock.")
    },
    creature("horse", "Horse", "🐴", 100, Herbivore, Zone::Field, Hard,
        "Strong and fast. A wonderful companion."),
    SpeciesSpec {
        produce: produce("Duck Egg", "🥚", 6),
        ..creature("duck", "Duck", "🦆", 15, Omnivore, Zone::Pond, Easy,
            "Loves paddling in the pond. Quacks cheerfully.")
    },
    SpeciesSpec {
        produce: produce("Feather", "🪶", 25),
        ..creature("swan", "Swan", "🦢", 200, Herbivore, Zone::Pond, Hard,
            "A symbol of grace. Glides proudly.")
    },
    creature("sheepdog", "Sheepdog", "🐕", 40, Carnivore, Zone::Barn, Medium,
        "Guards the farm from strangers. Very obedient."),
    // --- Garden: vegetables ---
    plant("carrot", "Carrot", 5, Zone::Vegetables, Easy, ["🌱", "🌿", "🥕"], false, 10,
        "Easy to grow and quick to harvest. A rabbit favorite."),
    plant("cabbage", "Cabbage", 8, Zone::Vegetables, Easy, ["🌱", "🪴", "🥬"], false, 18,
        "Thirsty, and thrives where it is cool."),
    plant("watermelon", "Watermelon", 15, Zone::Vegetables, Medium, ["🌱", "🍃", "🍉"], false, 35,
        "Big fruit that needs lots of soil. Great in summer."),
    plant("corn", "Corn", 10, Zone::Vegetables, Medium, ["🌱", "🌽", "🌽"], false, 22,
        "Tall stalks with sweet golden cobs."),
    // --- Garden: orchard ---
    plant("apple_tree", "Apple Tree", 50, Zone::Orchard, Hard, ["🌱", "🌳", "🍎"], true, 20,
        "Perennial. Slow to grow but fruits reliably."),
    plant("orange_tree", "Orange Tree", 55, Zone::Orchard, Hard, ["🌱", "🌳", "🍊"], true, 22,
        "Fragrant blossoms and juicy, vitamin-rich fruit."),
    plant("peach_tree", "Peach Tree", 60, Zone::Orchard, VeryHard, ["🌱", "🌳", "🍑"], true, 25,
        "Beautiful blossoms, sweet fruit, and a symbol of long life."),
    // --- Garden: flowers ---
    plant("rose", "Rose", 20, Zone::Flowers, Medium, ["🌱", "🥀", "🌹"], true, 15,
        "Queen of flowers. Needs careful tending."),
    plant("sunflower", "Sunflower", 12, Zone::Flowers, Easy, ["🌱", "🎋", "🌻"], false, 20,
        "Always faces the sun and spreads good energy."),
    plant("tulip", "Tulip", 25, Zone::Flowers, Hard, ["🌱", "🌷", "💐"], false, 40,
        "Elegant blooms in many bright colors."),
];

// ---------------------------------------------------------------------------
// Consumables
// ---------------------------------------------------------------------------

/// Shorthand for a consumable row.
const fn item(
    key: &'static str,
    name: &'static str,
    glyph: &'static str,
    price: u64,
    hunger: f64,
    happiness: f64,
    description: &'static str,
) -> Consumable {
    Consumable {
        key,
        name,
        glyph,
        price,
        hunger,
        happiness,
        description,
    }
}

/// Aquarium foods. Feeding also boosts reproduction.
pub static FISH_FOODS: &[Consumable] = &[
    item("crumbs", "Bread Crumbs", "🍞", 3, 10.0, 5.0, "Cheap, but hunger returns fast"),
    item("pellets", "Nutrient Pellets", "💊", 8, 30.0, 10.0, "Best value"),
    item("worms", "Bloodworms", "🪱", 15, 60.0, 25.0, "Good for growth"),
    item("shrimp", "Premium Shrimp", "🦐", 35, 100.0, 50.0, "Boosts breeding a lot"),
];

/// Zoo foods.
pub static ANIMAL_FOODS: &[Consumable] = &[
    item("grass", "Fresh Grass", "🌿", 5, 15.0, 5.0, "Basics for grazers"),
    item("fruit", "Fruit", "🍎", 12, 35.0, 20.0, "Sweet, lifts the mood"),
    item("meat", "Fresh Meat", "🍖", 20, 60.0, 15.0, "A must for carnivores"),
    item("premium", "Grade A Feed", "🍱", 40, 100.0, 60.0, "Helps animals thrive"),
];

/// Farm foods.
pub static FARM_FOODS: &[Consumable] = &[
    item("seeds", "Seeds", "🌾", 2, 10.0, 5.0, "Staple for poultry"),
    item("hay", "Hay", "🚜", 5, 20.0, 10.0, "Stock feed for livestock"),
    item("corn", "Corn Cob", "🌽", 8, 40.0, 15.0, "Great for fattening"),
    item("carrot", "Carrot", "🥕", 10, 50.0, 30.0, "A treat for rabbits and horses"),
];

/// Garden care items. Happiness boost also feeds growth.
pub static GARDEN_ITEMS: &[Consumable] = &[
    item("water", "Water", "💧", 0, 20.0, 0.0, "Free, every plant needs it"),
    item("fertilizer", "Fertilizer", "💩", 10, 50.0, 20.0, "Makes plants shoot up"),
    item("premium_soil", "Premium Soil", "🟤", 25, 100.0, 50.0, "Improves soil and fruit"),
    item("sun_lamp", "Sun Lamp", "💡", 40, 0.0, 100.0, "Artificial sunlight"),
];

// ---------------------------------------------------------------------------
// Restaurant
// ---------------------------------------------------------------------------

/// Shorthand for a menu row.
const fn dish(
    key: &'static str,
    name: &'static str,
    glyph: &'static str,
    price: u64,
    eat_ms: u64,
    kind: MenuKind,
) -> MenuItem {
    MenuItem {
        key,
        name,
        glyph,
        price,
        eat_ms,
        kind,
    }
}

/// The restaurant menu.
pub static MENU: &[MenuItem] = &[
    dish("burger", "Burger", "🍔", 30, 5000, MenuKind::Food),
    dish("pizza", "Pizza", "🍕", 40, 6000, MenuKind::Food),
    dish("sushi", "Sushi", "🍣", 50, 4000, MenuKind::Food),
    dish("steak", "Steak", "🥩", 80, 8000, MenuKind::Food),
    dish("carrot_cake", "Carrot Cake", "🥕", 20, 3000, MenuKind::Food),
    dish("egg_tart", "Egg Tart", "🥚", 15, 3000, MenuKind::Food),
    dish("coffee", "Coffee", "☕", 15, 3000, MenuKind::Drink),
    dish("milk", "Fresh Milk", "🥛", 12, 3000, MenuKind::Drink),
    dish("tea", "Peach Tea", "🍹", 18, 4000, MenuKind::Drink),
    dish("wine", "Red Wine", "🍷", 100, 6000, MenuKind::Drink),
];

/// Restaurant guests.
pub static CUSTOMERS: &[CustomerArchetype] = &[
    CustomerArchetype { name: "Rabbit Diner", glyph: "🐰", pace: 1.0 },
    CustomerArchetype { name: "Gourmet Bear", glyph: "🐻", pace: 0.8 },
    CustomerArchetype { name: "Noble Cat", glyph: "🐱", pace: 1.2 },
    CustomerArchetype { name: "Hungry Pig", glyph: "🐷", pace: 0.9 },
    CustomerArchetype { name: "Duck Diner", glyph: "🦆", pace: 1.1 },
];

/// Restaurant seating.
pub static TABLES: &[Table] = &[
    Table { id: 1, position: Position::new(20.0, 55.0) },
    Table { id: 2, position: Position::new(50.0, 55.0) },
    Table { id: 3, position: Position::new(80.0, 55.0) },
    Table { id: 4, position: Position::new(35.0, 80.0) },
    Table { id: 5, position: Position::new(65.0, 80.0) },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Look up a species by key.
pub fn species(key: &str) -> Option<&'static SpeciesSpec> {
    SPECIES.iter().find(|s| s.key == key)
}

/// Species sold in a zone, in shop order.
pub fn species_in(zone: Zone) -> impl Iterator<Item = &'static SpeciesSpec> {
    SPECIES.iter().filter(move |s| s.zone == zone)
}

/// The consumable table for a habitat. Empty for the restaurant.
pub const fn consumables(habitat: Habitat) -> &'static [Consumable] {
    match habitat {
        Habitat::Aquarium => FISH_FOODS,
        Habitat::Zoo => ANIMAL_FOODS,
        Habitat::Farm => FARM_FOODS,
        Habitat::Garden => GARDEN_ITEMS,
        Habitat::Restaurant => &[],
    }
}

/// Look up a consumable by key within a habitat's table.
pub fn consumable(habitat: Habitat, key: &str) -> Option<&'static Consumable> {
    consumables(habitat).iter().find(|c| c.key == key)
}

/// Look up a menu item by key.
pub fn menu_item(key: &str) -> Option<&'static MenuItem> {
    MENU.iter().find(|m| m.key == key)
}

/// Look up a table by number.
pub fn table(id: u8) -> Option<&'static Table> {
    TABLES.iter().find(|t| t.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn species_keys_are_unique() {
        let keys: BTreeSet<_> = SPECIES.iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), SPECIES.len());
    }

    #[test]
    fn every_zone_outside_the_restaurant_sells_something() {
        for habitat in Habitat::ALL {
            if habitat == Habitat::Restaurant {
                continue;
            }
            for zone in habitat.zones() {
                assert!(species_in(*zone).next().is_some(), "{zone} has no species");
            }
        }
    }

    #[test]
    fn creatures_have_diets_and_plants_do_not() {
        for spec in SPECIES {
            match spec.habitat() {
                Habitat::Garden => {
                    assert!(spec.diet.is_none());
                    assert!(spec.plant.is_some());
                }
                _ => {
                    assert!(spec.diet.is_some());
                    assert!(spec.plant.is_none());
                }
            }
            if spec.produce.is_some() {
                assert_eq!(spec.habitat(), Habitat::Farm);
            }
        }
    }

    #[test]
    fn resale_is_sixty_percent_rounded_down() {
        assert_eq!(species("goldfish").unwrap().resale_value(), 9);
        assert_eq!(species("whale").unwrap().resale_value(), 300);
        assert_eq!(species("chick").unwrap().resale_value(), 3);
        assert_eq!(species("carrot").unwrap().resale_value(), 3);
    }

    #[test]
    fn lookups_resolve_known_keys() {
        assert_eq!(species("dairy_cow").unwrap().produce.unwrap().price, 15);
        assert!(species("apple_tree").unwrap().plant.unwrap().perennial);
        assert_eq!(consumable(Habitat::Garden, "water").unwrap().price, 0);
        assert!(consumable(Habitat::Zoo, "water").is_none());
        assert!(consumables(Habitat::Restaurant).is_empty());
        assert_eq!(menu_item("steak").unwrap().eat_ms, 8000);
        assert_eq!(table(4).unwrap().position, Position::new(35.0, 80.0));
    }

    #[test]
    fn plant_glyphs_follow_stage() {
        let carrot = species("carrot").unwrap().plant.unwrap();
        assert_eq!(carrot.glyph_for_stage(0), "🌱");
        assert_eq!(carrot.glyph_for_stage(1), "🌿");
        assert_eq!(carrot.glyph_for_stage(3), "🥕");
    }
}
