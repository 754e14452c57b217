//! Built-in order queries.
//!
//! | name   | alias                     | answer                                   |
//! |--------|---------------------------|------------------------------------------|
//! | `pms`  | `most-ordered-item`       | pizza with the highest total quantity    |
//! | `pls`  | `least-ordered-item`      | pizza with the lowest total quantity     |
//! | `dms`  | `most-revenue-date`       | date with the highest revenue            |
//! | `dls`  | `least-revenue-date`      | date with the lowest revenue             |
//! | `dmsp` | `most-items-date`         | date with the most pizzas sold           |
//! | `dlsp` | `least-items-date`        | date with the fewest pizzas sold         |
//! | `apo`  | `average-items-per-order` | mean pizzas per order                    |
//! | `apd`  | `average-items-per-day`   | mean pizzas per day                      |
//! | `ims`  | `most-popular-ingredient` | ingredient in the most ordered pizzas    |
//! | `hp`   | `most-popular-category`   | category with the highest total quantity |

use crate::processing::Reduction;
use crate::types::fields;

use super::{AggregateQuery, Grouping, MessageTemplate, TotalStyle};

/// The built-in queries in listing order.
pub fn queries() -> Vec<AggregateQuery> {
    use Reduction::{Average, Least, Most};

    vec![
        AggregateQuery::new(
            "pms",
            Grouping::Field(fields::PIZZA_NAME),
            fields::QUANTITY,
            Most,
            MessageTemplate::value_only("The most ordered pizza is {value}."),
        )
        .alias("most-ordered-item")
        .describe("pizza with the highest total quantity"),
        AggregateQuery::new(
            "pls",
            Grouping::Field(fields::PIZZA_NAME),
            fields::QUANTITY,
            Least,
            MessageTemplate::value_only("The least ordered pizza is {value}."),
        )
        .alias("least-ordered-item")
        .describe("pizza with the lowest total quantity"),
        AggregateQuery::new(
            "dms",
            Grouping::Field(fields::ORDER_DATE),
            fields::TOTAL_PRICE,
            Most,
            MessageTemplate::with_total(
                "The date with the most revenue is {value} with a total of ${total}.",
                TotalStyle::Currency,
            ),
        )
        .alias("most-revenue-date")
        .describe("date with the highest revenue"),
        AggregateQuery::new(
            "dls",
            Grouping::Field(fields::ORDER_DATE),
            fields::TOTAL_PRICE,
            Least,
            MessageTemplate::with_total(
                "The date with the least revenue is {value} with a total of ${total}.",
                TotalStyle::Currency,
            ),
        )
        .alias("least-revenue-date")
        .describe("date with the lowest revenue"),
        AggregateQuery::new(
            "dmsp",
            Grouping::Field(fields::ORDER_DATE),
            fields::QUANTITY,
            Most,
            MessageTemplate::with_total(
                "The date with the most sold pizzas is {value} with a total of {total}.",
                TotalStyle::Whole,
            ),
        )
        .alias("most-items-date")
        .describe("date with the most pizzas sold"),
        AggregateQuery::new(
            "dlsp",
            Grouping::Field(fields::ORDER_DATE),
            fields::QUANTITY,
            Least,
            MessageTemplate::with_total(
                "The date with the least sold pizzas is {value} with a total of {total}.",
                TotalStyle::Whole,
            ),
        )
        .alias("least-items-date")
        .describe("date with the fewest pizzas sold"),
        AggregateQuery::new(
            "apo",
            Grouping::Field(fields::ORDER_ID),
            fields::QUANTITY,
            Average,
            MessageTemplate::value_only("The average ordered pizzas per order is {value}."),
        )
        .alias("average-items-per-order")
        .describe("mean pizzas per order"),
        AggregateQuery::new(
            "apd",
            Grouping::Field(fields::ORDER_DATE),
            fields::QUANTITY,
            Average,
            MessageTemplate::value_only("The average ordered pizzas per day is {value}."),
        )
        .alias("average-items-per-day")
        .describe("mean pizzas per day"),
        AggregateQuery::new(
            "ims",
            Grouping::ListEntries(fields::PIZZA_INGREDIENTS),
            fields::QUANTITY,
            Most,
            MessageTemplate::value_only("The most ordered ingredient is {value}."),
        )
        .alias("most-popular-ingredient")
        .describe("ingredient in the most ordered pizzas"),
        AggregateQuery::new(
            "hp",
            Grouping::Field(fields::PIZZA_CATEGORY),
            fields::QUANTITY,
            Most,
            MessageTemplate::value_only("The most ordered pizza category is {value}."),
        )
        .alias("most-popular-category")
        .describe("category with the highest total quantity"),
    ]
}
