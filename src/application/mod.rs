pub mod catalog;
pub mod orders;
pub mod queries;
pub mod seed;

#[cfg(test)]
pub(crate) mod testsupport;
