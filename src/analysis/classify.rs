// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::IncomeCategory;

// Ordered rule table; the first matching row wins.
const INCOME_RULES: &[(IncomeCategory, &[&str])] = &[
    (IncomeCategory::Salary, &["salary", "payroll", "wages"]),
    (
        IncomeCategory::Freelance,
        &["freelance", "contract", "consulting"],
    ),
    (IncomeCategory::Rental, &["rent", "property", "lease"]),
    (
        IncomeCategory::Investment,
        &["dividend", "interest", "investment"],
    ),
    (IncomeCategory::Business, &["business", "revenue", "sales"]),
];

const FIXED_EXPENSE_MARKERS: &[&str] = &[
    "rent",
    "mortgage",
    "insurance",
    "subscription",
    "utilities",
    "loan",
    "car payment",
    "phone",
    "internet",
    "streaming",
];

/// Classify an income grouping key (merchant or title) into a source
/// category. Case-insensitive substring match; unmatched keys land in
/// `Other` rather than erroring.
pub fn income_category_for(key: &str) -> IncomeCategory {
    let key = key.to_lowercase();
    for (category, markers) in INCOME_RULES {
        if markers.iter().any(|m| key.contains(m)) {
            return *category;
        }
    }
    IncomeCategory::Other
}

/// Whether an expense category label names a fixed monthly obligation.
pub fn is_fixed_expense(category: &str) -> bool {
    let category = category.to_lowercase();
    FIXED_EXPENSE_MARKERS.iter().any(|m| category.contains(m))
}
