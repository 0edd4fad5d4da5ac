//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper renders its items in order and prints a single
//! "No ... found." line for an empty collection.

use std::{fmt, ops::Index};

use crate::models::{
    Document, MonthlyCompletion, NeighborhoodCount, OverdueEntry, Property, RecentActivity,
    StepDefinition, StepProgress,
};

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $item:ty, $empty:literal) => {
        $(#[$meta])*
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    writeln!(f, $empty)
                } else {
                    for item in &self.0 {
                        write!(f, "{item}")?;
                    }
                    Ok(())
                }
            }
        }
    };
}

collection!(
    /// Properties with their ledgers.
    Properties,
    Property,
    "No properties found."
);

collection!(
    /// The step catalog in workflow order.
    ///
    /// ```rust
    /// use regula_core::display::StepDefinitions;
    ///
    /// assert_eq!(StepDefinitions(vec![]).to_string(), "No step definitions found.\n");
    /// ```
    StepDefinitions,
    StepDefinition,
    "No step definitions found."
);

collection!(
    /// Ledger entries.
    StepRecords,
    StepProgress,
    "No step records found."
);

collection!(Documents, Document, "No documents found.");

collection!(
    /// Overdue entries, most overdue first.
    OverdueEntries,
    OverdueEntry,
    "No overdue steps found."
);

collection!(
    NeighborhoodCounts,
    NeighborhoodCount,
    "No neighborhoods found."
);

collection!(
    MonthlyCompletions,
    MonthlyCompletion,
    "No completed steps in the last 12 months."
);

collection!(RecentActivities, RecentActivity, "No recent activity.");
