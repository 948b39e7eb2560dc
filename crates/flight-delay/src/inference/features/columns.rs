pub const NUMERIC_WIDTH: usize = 5;
pub const CATEGORICAL_WIDTH: usize = 4;

/// Numeric block, in the order the model was trained on.
pub const NUMERIC_FEATURES: [&str; NUMERIC_WIDTH] = [
    "distance_km",
    "decimal_hour",
    "temperature",
    "wind_speed",
    "visibility",
];

/// Categorical block, in the order the encoder was fitted on.
pub const CATEGORICAL_FEATURES: [&str; CATEGORICAL_WIDTH] =
    ["airline", "origin", "destination", "weekday"];

/// Category used for categorical columns the request did not provide.
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

/// Numeric columns ahead of imputation. `None` marks a value the imputer fills.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericBlock {
    pub values: [Option<f64>; NUMERIC_WIDTH],
}

/// Categorical columns ahead of encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalBlock {
    pub values: [String; CATEGORICAL_WIDTH],
}
