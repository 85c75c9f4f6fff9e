mod classifier_test;
mod config_test;
mod pipeline_test;
