pub mod anonymize_command;
pub mod default_config_command;
pub mod template_command;
