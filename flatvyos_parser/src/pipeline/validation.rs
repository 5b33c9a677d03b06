/// Validate that every stage is configured consistently
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::lexical::validate_lexical_configuration()?;
    crate::syntax::validate_syntax_configuration()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 2,
        "build_profile" => crate::config::build_info::profile()
    );

    Ok(())
}
