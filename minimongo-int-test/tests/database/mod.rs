mod builder_test;
mod persistence_test;
mod registry_test;
