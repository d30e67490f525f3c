use once_cell::sync::Lazy;

use indexmap::IndexMap;
use serde::Serialize;

pub const UNKNOWN: &str = "Unknown";

/// Description and treatment text shown alongside a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiseaseRecord {
    pub description: &'static str,
    pub treatment: &'static str,
}

/// Class ids emitted by the trained model, in training order.
pub static CLASS_NAMES: Lazy<IndexMap<u32, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        (0, "Black spot Bruising Disease"),
        (1, "Early Blight Disease"),
        (2, "Healthy"),
        (3, "Late Blight Disease"),
        (4, "Potato Brown Rot Disease"),
        (5, "Potato Dry Rot Disease"),
        (6, "Potato Soft Rot Disease"),
    ])
});

const EARLY_BLIGHT: DiseaseRecord = DiseaseRecord {
    description: "Early blight is a fungal disease that affects potato plants, characterized by brown spots with concentric rings on leaves.",
    treatment: "Apply fungicide, ensure proper plant spacing, and practice crop rotation.",
};

const LATE_BLIGHT: DiseaseRecord = DiseaseRecord {
    description: "Late blight is caused by the water mold Phytophthora infestans. It causes dark, water-soaked lesions on leaves and stems that quickly enlarge and turn brown.",
    treatment: "Apply fungicides containing copper or chlorothalonil at the first sign of disease. Remove infected plants. Avoid overhead irrigation.",
};

const HEALTHY: DiseaseRecord = DiseaseRecord {
    description: "The potato appears healthy with no visible signs of disease.",
    treatment: "Continue regular maintenance. Monitor for early signs of disease. Maintain good growing conditions with proper watering and fertilization.",
};

static UNKNOWN_RECORD: DiseaseRecord = DiseaseRecord {
    description: "The disease could not be identified with confidence.",
    treatment: "Consult with an agricultural expert for proper diagnosis and treatment recommendations.",
};

/// Every label either classifier can emit, plus [`UNKNOWN`].
pub static DISEASE_INFO: Lazy<IndexMap<&'static str, DiseaseRecord>> = Lazy::new(|| {
    IndexMap::from([
        // Heuristic labels
        ("Early Blight", EARLY_BLIGHT),
        ("Late Blight", LATE_BLIGHT),
        ("Healthy Potato", HEALTHY),
        // Model labels
        (
            "Black spot Bruising Disease",
            DiseaseRecord {
                description: "Blackspot bruising appears as dark patches beneath the skin, caused by physical damage during handling.",
                treatment: "Improve handling procedures, maintain proper storage temperatures, and ensure careful harvesting to minimize bruising.",
            },
        ),
        ("Early Blight Disease", EARLY_BLIGHT),
        ("Healthy", HEALTHY),
        ("Late Blight Disease", LATE_BLIGHT),
        (
            "Potato Brown Rot Disease",
            DiseaseRecord {
                description: "Brown rot is a bacterial disease causing wilting, yellowing of leaves, and rotting of tubers with a characteristic brown discoloration.",
                treatment: "Remove infected plants, practice crop rotation, use certified disease-free seed potatoes, and improve drainage in fields.",
            },
        ),
        (
            "Potato Dry Rot Disease",
            DiseaseRecord {
                description: "Dry rot causes sunken, wrinkled areas on tubers with internal cavities lined with white, yellow, or pink fungal growth.",
                treatment: "Store potatoes in cool, dry conditions, avoid wounding during harvest, and treat seed potatoes with fungicide before planting.",
            },
        ),
        (
            "Potato Soft Rot Disease",
            DiseaseRecord {
                description: "Soft rot is a bacterial disease causing wet, mushy decay of tubers with a foul odor.",
                treatment: "Harvest during dry conditions, avoid bruising, ensure proper ventilation during storage, and remove infected tubers promptly.",
            },
        ),
        (UNKNOWN, UNKNOWN_RECORD),
    ])
});

/// Looks up the reference text for `label`, falling back to the
/// [`UNKNOWN`] record for labels outside the table.
pub fn lookup(label: &str) -> &'static DiseaseRecord {
    DISEASE_INFO.get(label).unwrap_or(&UNKNOWN_RECORD)
}

/// Maps a model class id to its label.
pub fn class_name(class_id: u32) -> &'static str {
    CLASS_NAMES.get(&class_id).copied().unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_model_class_has_a_record() {
        for name in CLASS_NAMES.values() {
            assert!(DISEASE_INFO.contains_key(name), "missing record for {name}");
        }
    }

    #[test]
    fn heuristic_labels_have_records() {
        for label in ["Early Blight", "Late Blight", "Healthy Potato"] {
            assert!(DISEASE_INFO.contains_key(label), "missing record for {label}");
        }
    }

    #[test]
    fn unmapped_class_id_is_unknown() {
        assert_eq!(class_name(1), "Early Blight Disease");
        assert_eq!(class_name(42), UNKNOWN);
    }

    #[test]
    fn lookup_of_unlisted_label_returns_unknown_record() {
        assert_eq!(lookup("Potato Wart"), lookup(UNKNOWN));
        assert_eq!(lookup("Early Blight").treatment, EARLY_BLIGHT.treatment);
    }
}
