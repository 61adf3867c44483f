//! Common constants used throughout plugsmith.

/// Answer group holding one yes/no answer per host model
pub const MODELS_GROUP: &str = "register_to_models";

pub const DEFAULT_DESCRIPTION: &str = "A FairDM plugin.";
pub const DEFAULT_PYTHON_VERSION: &str = "3.11";
pub const DEFAULT_CATEGORY: &str = "EXPLORE";
pub const DEFAULT_ICON: &str = "puzzle-piece";
