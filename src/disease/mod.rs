pub mod catalog;

pub use catalog::{class_name, lookup, DiseaseRecord, CLASS_NAMES, DISEASE_INFO, UNKNOWN};
