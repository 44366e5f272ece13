mod batch_tests;
mod pricing_properties;
mod risk_mode_workflow;
