pub mod test_read;
