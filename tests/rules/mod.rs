mod sl001_test;
mod sl002_test;
mod sl003_test;
mod sl004_test;
