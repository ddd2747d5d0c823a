pub mod attribute_utils;
pub mod error;
pub mod json_field;
pub mod score_parser;
