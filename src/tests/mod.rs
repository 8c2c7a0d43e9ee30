mod generator_tests;
mod verifier_tests;
