pub mod dupe_tests;
