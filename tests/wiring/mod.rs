pub mod test_build;
