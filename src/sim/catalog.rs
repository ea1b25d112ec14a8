//! Static content: bin kinds, bin layout and the item archetype catalog

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ITEM_BASE_SIZE, ITEM_FALLBACK_SIZE};

/// Sorting stream a bin accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinKind {
    /// Mixed (unsorted) waste
    Black,
    /// Light packaging
    Yellow,
    /// Glass
    Green,
    /// Bio waste
    Brown,
    /// Paper
    Blue,
    /// Hazardous
    Red,
}

impl BinKind {
    pub const ALL: [BinKind; 6] = [
        BinKind::Black,
        BinKind::Yellow,
        BinKind::Green,
        BinKind::Brown,
        BinKind::Blue,
        BinKind::Red,
    ];

    /// Display name of the stream
    pub fn label(&self) -> &'static str {
        match self {
            BinKind::Black => "Mixed waste",
            BinKind::Yellow => "Light packaging",
            BinKind::Green => "Glass packaging",
            BinKind::Brown => "Bio waste",
            BinKind::Blue => "Paper",
            BinKind::Red => "Hazardous waste",
        }
    }

    /// Phrase used in the wrong-sort message ("... belongs in <target>")
    pub fn dialog_target(&self) -> &'static str {
        match self {
            BinKind::Black => "the mixed waste bin",
            BinKind::Yellow => "the light packaging bin",
            BinKind::Green => "the glass bin",
            BinKind::Brown => "the bio waste bin",
            BinKind::Blue => "the paper bin",
            BinKind::Red => "the hazardous waste box",
        }
    }

    /// Accent color as `#rrggbb`
    pub fn color_hex(&self) -> &'static str {
        match self {
            BinKind::Black => "#2c2c2c",
            BinKind::Yellow => "#ffd700",
            BinKind::Green => "#4caf50",
            BinKind::Brown => "#8b4513",
            BinKind::Blue => "#1565c0",
            BinKind::Red => "#ff9e44",
        }
    }
}

/// Static placement of one bin along the bottom of the play area
#[derive(Debug, Clone, Copy)]
pub struct BinSpec {
    pub kind: BinKind,
    pub x: f32,
    pub width: f32,
    pub bottom_offset: f32,
    pub image_id: &'static str,
    pub open_image_id: Option<&'static str>,
    /// Draw order (lower draws first, hit-tested last)
    pub order: u8,
}

impl BinSpec {
    pub fn has_open_animation(&self) -> bool {
        self.open_image_id.is_some()
    }
}

/// Standard bin row
pub const BIN_LAYOUT: [BinSpec; 6] = [
    BinSpec {
        kind: BinKind::Black,
        x: 65.0,
        width: 170.0,
        bottom_offset: 165.0,
        image_id: "playzone-black-bin",
        open_image_id: Some("playzone-black-bin-open"),
        order: 0,
    },
    BinSpec {
        kind: BinKind::Yellow,
        x: 205.0,
        width: 170.0,
        bottom_offset: 170.0,
        image_id: "playzone-yellow-bin",
        open_image_id: Some("playzone-yellow-bin-open"),
        order: 1,
    },
    BinSpec {
        kind: BinKind::Green,
        x: 367.0,
        width: 158.0,
        bottom_offset: 170.0,
        image_id: "playzone-green-bin",
        open_image_id: Some("playzone-green-bin-open"),
        order: 3,
    },
    BinSpec {
        kind: BinKind::Brown,
        x: 515.0,
        width: 165.0,
        bottom_offset: 165.0,
        image_id: "playzone-brown-bin",
        open_image_id: Some("playzone-brown-bin-open"),
        order: 2,
    },
    BinSpec {
        kind: BinKind::Blue,
        x: 660.0,
        width: 168.0,
        bottom_offset: 170.0,
        image_id: "playzone-blue-bin",
        open_image_id: Some("playzone-blue-bin-open"),
        order: 1,
    },
    BinSpec {
        kind: BinKind::Red,
        x: 745.0,
        width: 200.0,
        bottom_offset: 125.0,
        image_id: "playzone-hazard-box",
        open_image_id: None,
        order: 4,
    },
];

/// How badly a wrong sort harms the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
}

impl Impact {
    pub fn label(&self) -> &'static str {
        match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
            Impact::VeryHigh => "Very high",
            Impact::Critical => "Critical",
        }
    }
}

/// Educational note shown after a wrong sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consequence {
    pub text: &'static str,
    pub effect: &'static str,
    pub impact: Impact,
}

/// Template for one kind of trash item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    pub name: &'static str,
    pub kind: BinKind,
    pub image_id: &'static str,
    pub consequence: Consequence,
}

const fn item(
    kind: BinKind,
    name: &'static str,
    image_id: &'static str,
    text: &'static str,
    effect: &'static str,
    impact: Impact,
) -> Archetype {
    Archetype {
        name,
        kind,
        image_id,
        consequence: Consequence {
            text,
            effect,
            impact,
        },
    }
}

use BinKind::*;
use Impact::*;

/// Built-in item set
pub const STANDARD_ITEMS: [Archetype; 31] = [
    item(Yellow, "Plastic bottle", "item-plastic-bottle",
        "Plastic bottles take a very long time to break down and turn into microplastics.",
        "Soil and water polluted with microplastics", VeryHigh),
    item(Brown, "Broccoli", "item-brokkoli",
        "Food waste rots in landfill and releases greenhouse gases.",
        "Methane emissions accelerate climate change", Medium),
    item(Black, "Cigarette butt", "item-cigarette",
        "Cigarette butts contain toxic substances and a plastic filter.",
        "Soil and water poisoned with toxins", High),
    item(Red, "Perfume bottle", "item-perfume",
        "Perfume residue contains solvents and fragrances that harm aquatic life.",
        "Chemical pollution of water and air", High),
    item(Yellow, "Soda can", "item-cansoda",
        "Aluminium cans are a valuable material that can be recycled many times.",
        "Extra CO2 emissions and lost raw material when thrown out with household waste", Medium),
    item(Brown, "Banana peel", "item-bananapeel",
        "Organic waste in landfill smells and produces greenhouse gases.",
        "Attracts animals and releases methane", Low),
    item(Brown, "Apple core", "item-applecore",
        "Food scraps in mixed waste become a source of emissions and odour.",
        "Greenhouse gases released while decomposing", Low),
    item(Green, "Broken glass bottle", "item-brokenbottle",
        "Glass barely breaks down in nature and its shards are dangerous to people and animals.",
        "Injury risk and long-lasting pollution", High),
    item(Red, "Mercury thermometer", "item-thermometer",
        "Mercury is a highly toxic metal, dangerous even in small amounts.",
        "Severe air, soil and water pollution", Critical),
    item(Yellow, "Plastic bag", "item-plasticbag",
        "Plastic bags escape into the environment easily and take ages to degrade.",
        "Animals get tangled or mistake the film for food", High),
    item(Red, "Light bulb", "item-bulb",
        "Energy-saving bulbs contain mercury, a very dangerous substance.",
        "Poisoning from mercury vapour", VeryHigh),
    item(Brown, "Egg shells", "item-eggs",
        "Food leftovers spoil quickly in mixed waste and start to smell.",
        "Unsanitary conditions and extra emissions while rotting", Low),
    item(Black, "Paper cup", "item-papercup",
        "Disposable cups are lined with plastic and cannot go through normal paper recycling.",
        "Contaminated paper stream and extra waste", Medium),
    item(Green, "Glass bottle", "item-glassbottle",
        "Glass can be recycled many times instead of mining new raw materials.",
        "Wasted resources and more energy for new glass", High),
    item(Red, "Batteries", "item-batteries",
        "Batteries contain heavy metals that poison soil and water.",
        "Heavy-metal pollution", VeryHigh),
    item(Brown, "Leaves", "item-leaves",
        "Leaves are valuable compost but simply rot in landfill.",
        "A resource for improving soil is lost", Low),
    item(Green, "Liquor bottle", "item-liquorbottle",
        "Drink bottles are recyclable and survive repeated melting.",
        "Wasted glass and more energy for new bottles", High),
    item(Red, "Medicine bottle", "item-medicine",
        "Medicine residue can reach water and affect animals and people.",
        "Chemical pollution and drug-resistant microbes", VeryHigh),
    item(Red, "Spray paint can", "item-spraycan",
        "Aerosol cans contain solvents and can explode.",
        "Air pollution and fire risk", High),
    item(Black, "Broken plate", "item-brokenplate",
        "Ceramics are not recycled like ordinary glass.",
        "Spoiled glass recycling batches and extra waste", Medium),
    item(Yellow, "Milk carton", "item-milkcarton",
        "Drink cartons are composite packaging that can be recycled when collected separately.",
        "Bigger landfills and lost raw material", Medium),
    item(Black, "Toy plane", "item-toyplane",
        "Toys are often made of mixed materials that ordinary recycling cannot handle.",
        "More unsortable waste", Medium),
    item(Black, "Candle", "item-candle",
        "Paraffin leftovers and wicks cannot be recycled by the usual system.",
        "More unsortable waste", Low),
    item(Brown, "Bone", "item-bone",
        "Bones break down slowly and attract animals when left in mixed waste.",
        "Unsanitary conditions and odour", Low),
    item(Black, "Diapers", "item-diapers",
        "Diapers contain absorbent polymers and biological contaminants and are not recycled.",
        "Large volumes of unsortable waste and infection risk", Medium),
    item(Blue, "Written paper sheet", "item-paper",
        "Paper is one of the easiest and most valuable materials to recycle.",
        "More trees cut down and growing landfills", Medium),
    item(Red, "Mobile phone", "item-phone",
        "Phones contain metals, a battery and electronics that are dangerous when dumped.",
        "Heavy-metal and chemical pollution", VeryHigh),
    item(Black, "Dirty paper", "item-dirtypaper",
        "Paper soiled with grease or food is unfit for recycling.",
        "Spoiled paper recycling batches", Medium),
    item(Black, "Towel", "item-towel",
        "Textiles unfit for reuse usually cannot be recycled.",
        "More unsortable waste", Medium),
    item(Blue, "Book", "item-book",
        "Paper products are recyclable and can become new paper.",
        "Wasted paper resources and more waste", Medium),
    item(Yellow, "Crisps bag", "item-crisps",
        "Multi-layer packaging is recyclable when handed in correctly.",
        "Extra packaging pollution in mixed waste", Medium),
];

/// Item archetypes plus their resolved sprite sizes
#[derive(Debug, Clone)]
pub struct Catalog {
    archetypes: Vec<Archetype>,
    sizes: Vec<Vec2>,
}

impl Catalog {
    /// Build a catalog, dropping archetypes whose bin kind has no bin.
    pub fn new(archetypes: &[Archetype], bins: &[BinKind]) -> Self {
        let archetypes: Vec<Archetype> = archetypes
            .iter()
            .filter(|a| {
                let ok = bins.contains(&a.kind);
                if !ok {
                    log::warn!("Dropping item '{}': no {:?} bin in play", a.name, a.kind);
                }
                ok
            })
            .copied()
            .collect();
        let sizes = vec![Vec2::splat(ITEM_FALLBACK_SIZE); archetypes.len()];
        Self { archetypes, sizes }
    }

    /// Built-in items against the standard bin row
    pub fn standard() -> Self {
        let kinds: Vec<BinKind> = BIN_LAYOUT.iter().map(|b| b.kind).collect();
        Self::new(&STANDARD_ITEMS, &kinds)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Archetype> {
        self.archetypes.get(index)
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Sprite size for an archetype
    pub fn size(&self, index: usize) -> Vec2 {
        self.sizes
            .get(index)
            .copied()
            .unwrap_or(Vec2::splat(ITEM_FALLBACK_SIZE))
    }

    /// Fit sprites into a square of `ITEM_BASE_SIZE` keeping their aspect
    /// ratio. `natural_size` returns `None` for images that are not loaded.
    pub fn resolve_sizes(&mut self, natural_size: impl Fn(&str) -> Option<Vec2>) {
        for (archetype, size) in self.archetypes.iter().zip(self.sizes.iter_mut()) {
            *size = match natural_size(archetype.image_id) {
                Some(n) if n.x > 0.0 && n.y > 0.0 => {
                    let aspect = n.y / n.x;
                    if aspect > 1.0 {
                        Vec2::new(ITEM_BASE_SIZE / aspect, ITEM_BASE_SIZE)
                    } else {
                        Vec2::new(ITEM_BASE_SIZE, ITEM_BASE_SIZE * aspect)
                    }
                }
                _ => Vec2::splat(ITEM_FALLBACK_SIZE),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_standard_item_has_a_bin() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), STANDARD_ITEMS.len());
        for a in catalog.archetypes() {
            assert!(BIN_LAYOUT.iter().any(|b| b.kind == a.kind), "{}", a.name);
        }
    }

    #[test]
    fn items_without_a_bin_are_dropped() {
        let catalog = Catalog::new(&STANDARD_ITEMS, &[BinKind::Blue]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.archetypes().iter().all(|a| a.kind == BinKind::Blue));
    }

    #[test]
    fn sizes_keep_aspect_ratio() {
        let mut catalog = Catalog::standard();
        catalog.resolve_sizes(|id| match id {
            "item-plastic-bottle" => Some(Vec2::new(100.0, 200.0)),
            "item-brokkoli" => Some(Vec2::new(200.0, 100.0)),
            _ => None,
        });
        assert_eq!(catalog.size(0), Vec2::new(25.0, 50.0));
        assert_eq!(catalog.size(1), Vec2::new(50.0, 25.0));
        assert_eq!(catalog.size(2), Vec2::splat(ITEM_FALLBACK_SIZE));
    }

    #[test]
    fn bin_kind_serializes_lowercase() {
        let json = serde_json::to_string(&BinKind::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
    }
}
