//! `order-insights` loads a sales-order CSV file into memory and answers named aggregate queries
//! such as "most ordered pizza" or "date with the most revenue".
//!
//! The building blocks, leaves first:
//!
//! - [`map::TaggedMap`]: an open-addressed string map whose values are either text or numbers
//!   ([`types::TaggedValue`]). It holds both loaded records and per-query group totals.
//! - [`types::RecordStore`]: one [`types::Record`] per data line, in file order.
//! - [`ingestion`]: the lenient order-file reader ([`ingestion::load_orders`]).
//! - [`processing`]: group-by aggregation with `most`/`least`/`average` reductions.
//! - [`queries`]: the named query vocabulary (`pms`, `dms`, `apo`, ...).
//! - [`execution`]: runs a list of command names, sequentially or on a thread pool.
//!
//! ## Input format
//!
//! The first line is a header and is skipped. Each following line holds twelve columns:
//!
//! ```text
//! pizza_id,order_id,pizza_name_id,quantity,order_date,order_time,unit_price,total_price,pizza_size,pizza_category,pizza_ingredients,pizza_name
//! 1,1,hawaiian_m,1,1/1/2015,11:38:36,13.25,13.25,M,Classic,"Sliced Ham, Pineapple, Mozzarella Cheese",The Hawaiian Pizza
//! ```
//!
//! Lines are read permissively: a line that stops matching the schema keeps the fields read up to
//! that point instead of failing the load.
//!
//! ## Quick example
//!
//! ```rust
//! use order_insights::execution::ExecutionEngine;
//! use order_insights::ingestion::read_orders_from_str;
//! use order_insights::queries::QueryRegistry;
//!
//! let input = "\
//! pizza_id,order_id,pizza_name_id,quantity,order_date,order_time,unit_price,total_price,pizza_size,pizza_category,pizza_ingredients,pizza_name
//! 1,1,hawaiian_m,1,1/1/2015,11:38:36,13.25,13.25,M,Classic,\"Sliced Ham, Pineapple\",The Hawaiian Pizza
//! 2,2,bbq_ckn_l,3,1/1/2015,11:57:40,20.75,62.25,L,Chicken,\"Chicken, Onions\",The BBQ Chicken Pizza
//! ";
//! let orders = read_orders_from_str(input).unwrap().records;
//!
//! let outcomes = ExecutionEngine::sequential().run_commands(
//!     &QueryRegistry::standard(),
//!     &orders,
//!     &["pms", "unknown", "apo"],
//! );
//! let lines: Vec<&str> = outcomes.iter().map(|o| o.message.as_str()).collect();
//! assert_eq!(
//!     lines,
//!     vec![
//!         "The most ordered pizza is The BBQ Chicken Pizza.",
//!         "Command 'unknown' not found.",
//!         "The average ordered pizzas per order is 2.0.",
//!     ]
//! );
//! ```
//!
//! ## Reductions
//!
//! - [`processing::Reduction::Most`]: key with the largest total. Totals are compared against a
//!   running maximum that starts at zero, so groups totalling zero or less never win and an
//!   all-zero dataset has no answer.
//! - [`processing::Reduction::Least`]: key with the smallest total.
//! - [`processing::Reduction::Average`]: mean of the per-group totals (e.g. "pizzas per order"),
//!   formatted with one decimal.
//!
//! Exact ties go to the group that was seen first.

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod map;
pub mod processing;
pub mod queries;
pub mod types;

pub use error::{ExecutionError, IngestionError, IngestionResult};
