pub mod explorer;
pub mod generate;
pub mod settings;
