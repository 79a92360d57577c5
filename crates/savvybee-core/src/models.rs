//! Data models for SavvyBee
//!
//! These describe the shapes the client expects back from the structured
//! endpoints. Upstream replies are passed through as raw JSON objects, so the
//! structs here build the fallback objects and let library callers
//! deserialize a reply they want typed. Nothing validates model output
//! against them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line item on a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub price: String,
}

/// Receipt analysis returned by `/analyze-receipt`
///
/// Every field is best-effort text; absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ReceiptItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spending_insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_insight: Option<String>,
}

impl ReceiptAnalysis {
    /// Substituted when the model reply has no usable JSON object
    pub fn fallback() -> Self {
        Self {
            merchant_name: Some("Receipt Analysis".into()),
            date: Some("Recent".into()),
            total_amount: Some("Unknown".into()),
            category: Some("General".into()),
            spending_insight: Some(
                "Could not extract detailed information from the receipt. Please try with a clearer image."
                    .into(),
            ),
            saving_tip: Some(
                "Consider using digital receipts when available for better tracking.".into(),
            ),
            health_insight: Some(
                "Remember to balance your budget for both necessities and self-care.".into(),
            ),
            ..Default::default()
        }
    }

    pub fn fallback_value() -> Value {
        to_value(&Self::fallback())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPattern {
    pub category: String,
    pub amount: String,
    /// "up", "down" or "stable"
    pub trend: String,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingOpportunity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPayment {
    pub description: String,
    pub amount: String,
    pub due_in: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrends {
    pub total_spending: String,
    pub previous_month: String,
    pub difference: String,
    pub top_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub name: String,
    pub current: String,
    pub target: String,
    pub percentage: String,
}

/// Monthly overview returned by `/financial-summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub spending_patterns: Vec<SpendingPattern>,
    pub saving_opportunities: Vec<SavingOpportunity>,
    pub upcoming_payments: Vec<UpcomingPayment>,
    pub monthly_trends: MonthlyTrends,
    pub health_impact: String,
    pub goal_progress: GoalProgress,
}

impl FinancialSummary {
    /// Substituted when the model reply has no usable JSON object
    pub fn fallback() -> Self {
        Self {
            spending_patterns: vec![SpendingPattern {
                category: "Food".into(),
                amount: "$450".into(),
                trend: "up".into(),
                percentage: "15%".into(),
            }],
            saving_opportunities: vec![SavingOpportunity {
                kind: "Subscriptions".into(),
                description: "You could save $120/month by reducing subscription services".into(),
                amount: "$120".into(),
            }],
            upcoming_payments: vec![UpcomingPayment {
                description: "Rent payment".into(),
                amount: "$950".into(),
                due_in: "3 days".into(),
            }],
            monthly_trends: MonthlyTrends {
                total_spending: "$2,150".into(),
                previous_month: "$1,980".into(),
                difference: "+$170".into(),
                top_category: "Food".into(),
            },
            health_impact: "Your food expenses are 15% higher than last month. Cooking at home more often is good for both your wallet and your health.".into(),
            goal_progress: GoalProgress {
                name: "Emergency Fund".into(),
                current: "$1,200".into(),
                target: "$3,000".into(),
                percentage: "40%".into(),
            },
        }
    }

    pub fn fallback_value() -> Value {
        to_value(&Self::fallback())
    }
}

/// Serialize a fallback; these types only hold strings, so this cannot fail
fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_fallback_literal() {
        let expected = json!({
            "merchantName": "Receipt Analysis",
            "date": "Recent",
            "totalAmount": "Unknown",
            "category": "General",
            "spendingInsight": "Could not extract detailed information from the receipt. Please try with a clearer image.",
            "savingTip": "Consider using digital receipts when available for better tracking.",
            "healthInsight": "Remember to balance your budget for both necessities and self-care."
        });
        assert_eq!(ReceiptAnalysis::fallback_value(), expected);
    }

    #[test]
    fn test_financial_fallback_literal() {
        let value = FinancialSummary::fallback_value();
        assert_eq!(value["spendingPatterns"][0]["category"], "Food");
        assert_eq!(value["savingOpportunities"][0]["type"], "Subscriptions");
        assert_eq!(value["upcomingPayments"][0]["dueIn"], "3 days");
        assert_eq!(value["monthlyTrends"]["difference"], "+$170");
        assert_eq!(value["goalProgress"]["percentage"], "40%");
        assert!(value["healthImpact"].as_str().unwrap().starts_with("Your food"));
    }

    #[test]
    fn test_fallbacks_are_byte_identical() {
        let a = serde_json::to_string(&FinancialSummary::fallback_value()).unwrap();
        let b = serde_json::to_string(&FinancialSummary::fallback_value()).unwrap();
        assert_eq!(a, b);

        let a = serde_json::to_string(&ReceiptAnalysis::fallback_value()).unwrap();
        let b = serde_json::to_string(&ReceiptAnalysis::fallback_value()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_receipt_analysis_parses_partial_reply() {
        let analysis: ReceiptAnalysis = serde_json::from_value(json!({
            "merchantName": "Trader Joe's",
            "items": [{"name": "Bananas", "price": "$0.99"}]
        }))
        .unwrap();
        assert_eq!(analysis.merchant_name.as_deref(), Some("Trader Joe's"));
        assert_eq!(analysis.items.unwrap().len(), 1);
        assert!(analysis.total_amount.is_none());
    }

    #[test]
    fn test_financial_summary_typed_from_fallback_value() {
        let summary: FinancialSummary =
            serde_json::from_value(FinancialSummary::fallback_value()).unwrap();
        assert_eq!(summary, FinancialSummary::fallback());
    }
}
