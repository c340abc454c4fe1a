pub mod get_args;
pub mod score_phenotypes;
