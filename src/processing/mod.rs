//! In-memory aggregation over a [`crate::types::RecordStore`].
//!
//! Every call builds its own throwaway group-totals [`crate::map::TaggedMap`], so calls never
//! share mutable state and can run in any order (or in parallel) against the same store.
//!
//! Currently implemented:
//!
//! - [`aggregate()`]: group by one field, sum another, reduce with a [`Reduction`]
//! - [`aggregate_ingredients()`]: same, but grouping by each entry of a comma-separated list
//!
//! ## Example: revenue per day
//!
//! ```rust
//! use order_insights::ingestion::read_orders_from_str;
//! use order_insights::processing::{aggregate, Reduction};
//!
//! let input = "\
//! pizza_id,order_id,pizza_name_id,quantity,order_date,order_time,unit_price,total_price,pizza_size,pizza_category,pizza_ingredients,pizza_name
//! 1,1,hawaiian_m,1,1/1/2015,11:38:36,13.25,13.25,M,Classic,\"Sliced Ham, Pineapple\",The Hawaiian Pizza
//! 2,2,bbq_ckn_l,2,1/1/2015,11:57:40,20.75,41.50,L,Chicken,\"Chicken, Onions\",The BBQ Chicken Pizza
//! 3,3,bbq_ckn_s,1,1/2/2015,12:12:28,12.75,12.75,S,Chicken,\"Chicken, Onions\",The BBQ Chicken Pizza
//! ";
//! let orders = read_orders_from_str(input).unwrap().records;
//!
//! let best = aggregate(&orders, "order_date", "total_price", Reduction::Most).unwrap();
//! assert_eq!(best.value, "1/1/2015");
//! assert_eq!(best.total, Some(54.75));
//! ```

pub mod aggregate;
pub mod ingredients;

pub use aggregate::{
    accumulate, aggregate, group_key, group_totals, AggregateResult, ParseReductionError, Reduction,
};
pub use ingredients::{aggregate_ingredients, ingredient_totals, split_list};
