//! Core data types for homology searches.
//!
//! - [`ReferenceDatabase`](database::ReferenceDatabase): a searchable database and its
//!   validated on-disk [`DatabaseLocation`](database::DatabaseLocation)
//! - [`AlignedSequence`](alignment::AlignedSequence): one row of a pairwise alignment
//! - [`SearchResult`](alignment::SearchResult): a scored query/target alignment
//! - [`DatabaseName`], [`ImplementationName`], [`Strand`]: small value types
//! - [`report`]: JSON and BLAST tabular views of results
//!
//! All of these are immutable once built and live only for a single search.
//!
//! [`DatabaseName`]: types::DatabaseName
//! [`ImplementationName`]: types::ImplementationName
//! [`Strand`]: types::Strand

pub mod alignment;
pub mod database;
pub mod report;
pub mod types;
