pub mod test_compile;
