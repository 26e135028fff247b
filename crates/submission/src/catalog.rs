/// Label shown for the unselected violation type option.
pub const VIOLATION_TYPE_PLACEHOLDER_LABEL: &str = "Select violation type";

// Keys are what the backend stores; some carry historical spellings.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("address_sign", "Address Sign"),
    ("artificial_plantings", "Artificial Plantings"),
    ("basketball_backboards", "Basketball Backboards"),
    ("decks", "Decks"),
    ("drainage", "Drainage"),
    ("drains", "Drains"),
    ("exterior_lighting", "Exterior Lighting"),
    ("exterior_mechanical_equipment", "Exterior Mechanical Equipment"),
    ("exterior_painting", "Exterior Painting"),
    ("exterior_shutters", "Exterior Shutters"),
    ("exterior_stairs", "Exterior Stairs"),
    ("fences", "Fences"),
    ("flag_poles", "Flag Poles"),
    ("garden_art_front_yard", "Garden Art - Front Yard"),
    ("garden_window", "Garden Window"),
    ("ground_garden_level_decks", "Ground & Garden Level Decks"),
    ("heights_maximum", "Heights - Maximum"),
    ("holiday_lighting", "Holiday Lighting"),
    ("irrigation", "Irrigation"),
    ("lamp_posts", "Lamp Posts"),
    ("patios", "Patios"),
    ("pet_enclosures", "Pet Enclosures"),
    ("play_equipment", "Play Equipment"),
    ("pools_and_spas", "Pools and Spas"),
    ("ramps_handicap", "Ramps - Handicap"),
    ("satellite_dishes_tennae", "Satellite Dishes / Antennae"),
    ("screen_orm_doors", "Screen / Storm Doors"),
    ("solar_energy_systems", "Solar Energy Systems"),
    ("accesory_structures", "Accessory Structures"),
    ("trash_recycle_cans", "Trash / Recycle Cans"),
    ("unsightly_items", "Unsightly Items"),
    ("walls", "Walls"),
    ("window_awnings", "Window Awnings"),
    ("window_coverings", "Window Coverings"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationType {
    pub key: String,
    pub label: String,
}

/// Violation types offered on the form, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationTypeCatalog {
    types: Vec<ViolationType>,
}

impl ViolationTypeCatalog {
    pub fn new(types: Vec<ViolationType>) -> Self {
        Self { types }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_TYPES
                .iter()
                .map(|(key, label)| ViolationType {
                    key: (*key).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
        )
    }

    pub fn contains(&self, key: &str) -> bool {
        self.types.iter().any(|t| t.key == key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolationType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for ViolationTypeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
