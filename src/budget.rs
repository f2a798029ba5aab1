//! Derived figures for the current budget: totals, balance, savings ratio,
//! status, and each category's share of the donut.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::format::{format_currency, format_percent};
use crate::model::AppState;
use crate::settings::{palette_color, Currency, ELEVATED_RATIO, UNDER_CONTROL_RATIO};

/// Substring (after case and diacritic folding) that marks the savings category.
const SAVINGS_MARKER: &str = "usp";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Warn,
    Bad,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Status {
    Overspent(f64),
    UnderControl,
    Elevated,
    ApproachingLimit,
    WaitingForData,
}

impl Status {
    pub fn tone(&self) -> Tone {
        match self {
            Status::Overspent(_) => Tone::Bad,
            Status::UnderControl => Tone::Ok,
            Status::Elevated | Status::ApproachingLimit | Status::WaitingForData => Tone::Warn,
        }
    }

    pub fn label(&self, currency: Currency) -> String {
        match self {
            Status::Overspent(amount) => {
                format!("Přečerpáno o {}", format_currency(*amount, currency))
            }
            Status::UnderControl => "Výdaje pod kontrolou".to_string(),
            Status::Elevated => "Výdaje vyšší".to_string(),
            Status::ApproachingLimit => "Blížíš se limitu".to_string(),
            Status::WaitingForData => "Čekám na data…".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub id: String,
    pub name: String,
    pub color: String,
    pub value: f64,
    /// Share of the drawn circle, 0..=100.
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Breakdown {
    pub income: f64,
    pub expenses: f64,
    pub remaining: f64,
    pub overspend: f64,
    /// Savings category value over income; `None` without income or a
    /// savings category.
    pub savings_ratio: Option<f64>,
    pub status: Status,
    pub shares: Vec<CategoryShare>,
    pub leftover_percent: f64,
}

impl Default for Breakdown {
    fn default() -> Self {
        Self {
            income: 0.0,
            expenses: 0.0,
            remaining: 0.0,
            overspend: 0.0,
            savings_ratio: None,
            status: Status::WaitingForData,
            shares: Vec::new(),
            leftover_percent: 0.0,
        }
    }
}

/// Display strings for the summary panel and the donut's center.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryTexts {
    pub total_expenses: String,
    pub remaining: String,
    pub savings_ratio: String,
    pub headline: String,
    pub caption: String,
    pub status: String,
    pub tone: Tone,
}

const PLACEHOLDER: &str = "–";

impl Breakdown {
    pub fn texts(&self, currency: Currency) -> SummaryTexts {
        let has_income = self.income > 0.0;
        let has_expenses = self.expenses > 0.0;
        SummaryTexts {
            total_expenses: if has_income || has_expenses {
                format_currency(self.expenses, currency)
            } else {
                PLACEHOLDER.to_string()
            },
            remaining: if has_income {
                format_currency(self.remaining, currency)
            } else {
                PLACEHOLDER.to_string()
            },
            savings_ratio: self
                .savings_ratio
                .map(format_percent)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            headline: if has_income {
                format_currency(self.income, currency)
            } else {
                format_currency(self.expenses, currency)
            },
            caption: if has_income {
                "Měsíční příjem".to_string()
            } else {
                "Zadej příjem a výdaje".to_string()
            },
            status: self.status.label(currency),
            tone: self.status.tone(),
        }
    }
}

/// Lowercase, decompose and drop combining marks, so `Úspory` and
/// `U\u{301}spory` both fold to `uspory`.
pub fn fold_diacritics(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

pub fn is_savings_category(name: &str) -> bool {
    fold_diacritics(name).contains(SAVINGS_MARKER)
}

fn classify(income: f64, expenses: f64, overspend: f64) -> Status {
    if overspend > 0.0 {
        return Status::Overspent(overspend);
    }
    if income > 0.0 {
        let ratio = expenses / income;
        if ratio <= UNDER_CONTROL_RATIO {
            Status::UnderControl
        } else if ratio <= ELEVATED_RATIO {
            Status::Elevated
        } else {
            Status::ApproachingLimit
        }
    } else {
        Status::WaitingForData
    }
}

pub fn compute(state: &AppState) -> Breakdown {
    let income = state.income_amount();
    let values: Vec<f64> = state.categories.iter().map(|c| c.total()).collect();
    let expenses: f64 = values.iter().sum();
    let overspend = (expenses - income).max(0.0);
    let remaining = (income - expenses).max(0.0);

    let savings_ratio = if income > 0.0 {
        state
            .categories
            .iter()
            .zip(&values)
            .find(|(c, _)| is_savings_category(&c.name))
            .map(|(_, value)| value / income)
    } else {
        None
    };

    // Percentages are of income while it covers expenses, otherwise of the
    // expenses themselves, so the drawn slices never exceed the circle.
    let (base, leftover_percent) = if income > 0.0 && expenses <= income {
        (income, remaining / income * 100.0)
    } else if expenses > 0.0 {
        (expenses, 0.0)
    } else {
        (0.0, 0.0)
    };

    let shares = state
        .categories
        .iter()
        .zip(&values)
        .enumerate()
        .map(|(index, (c, value))| CategoryShare {
            id: c.id.clone(),
            name: c.name.clone(),
            color: if c.color.is_empty() {
                palette_color(index).to_string()
            } else {
                c.color.clone()
            },
            value: *value,
            percent: if base > 0.0 { value / base * 100.0 } else { 0.0 },
        })
        .collect();

    let breakdown = Breakdown {
        income,
        expenses,
        remaining,
        overspend,
        savings_ratio,
        status: classify(income, expenses, overspend),
        shares,
        leftover_percent,
    };
    tracing::debug!(
        income,
        expenses,
        overspend,
        leftover = leftover_percent,
        "recomputed budget"
    );
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "approx not equal: left={a} right={b} eps={eps}");
    }

    fn state(income: &str, categories: &[(&str, &str)]) -> AppState {
        let mut state = AppState::default();
        state.set_income(income);
        for (name, value) in categories {
            let id = state.add_category(name).unwrap().id.clone();
            state.set_category_value(&id, value);
        }
        state
    }

    #[test]
    fn folds_case_and_accents() {
        assert_eq!(fold_diacritics("ÚSPORY"), "uspory");
        assert_eq!(fold_diacritics("Žluťoučký kůň"), "zlutoucky kun");
        assert!(is_savings_category("Úspory na dovolenou"));
        assert!(is_savings_category("dlouhodobé usp."));
        assert!(!is_savings_category("Splátky"));
    }

    #[test]
    fn decomposed_names_match_savings() {
        assert_eq!(fold_diacritics("U\u{301}spory"), "uspory");
        assert!(is_savings_category("U\u{301}SPORY"));

        let b = compute(&state("30000", &[("U\u{301}spory", "5000")]));
        approx_eq(b.savings_ratio.unwrap(), 5000.0 / 30000.0, 1e-12);
    }

    #[test]
    fn empty_budget_waits_for_data() {
        let b = compute(&AppState::default());
        assert_eq!(b.status, Status::WaitingForData);
        assert_eq!(b.expenses, 0.0);
        assert_eq!(b.leftover_percent, 0.0);
        assert_eq!(b.savings_ratio, None);

        let b = compute(&state("", &[("A", ""), ("B", "abc")]));
        assert_eq!(b.status, Status::WaitingForData);
        assert!(b.shares.iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn income_covering_expenses() {
        let b = compute(&state("30000", &[("Splátky", "10000"), ("Úspory", "5000")]));
        assert_eq!(b.expenses, 15000.0);
        assert_eq!(b.remaining, 15000.0);
        assert_eq!(b.overspend, 0.0);
        assert_eq!(b.status, Status::UnderControl);
        approx_eq(b.savings_ratio.unwrap(), 1.0 / 6.0, 1e-12);
        approx_eq(b.leftover_percent, 50.0, 1e-9);
        approx_eq(b.shares[0].percent, 100.0 / 3.0, 1e-9);
        approx_eq(b.shares[1].percent, 100.0 / 6.0, 1e-9);
    }

    #[test]
    fn overspending_renormalizes_against_expenses() {
        let b = compute(&state("10000", &[("A", "6000"), ("B", "7000")]));
        assert_eq!(b.expenses, 13000.0);
        assert_eq!(b.overspend, 3000.0);
        assert_eq!(b.remaining, 0.0);
        assert_eq!(b.status, Status::Overspent(3000.0));
        assert_eq!(b.status.label(Currency::Czk), "Přečerpáno o 3\u{a0}000\u{a0}Kč");
        assert_eq!(b.status.tone(), Tone::Bad);
        assert_eq!(b.leftover_percent, 0.0);
        approx_eq(b.shares[0].percent, 46.153846, 1e-5);
        approx_eq(b.shares[1].percent, 53.846154, 1e-5);
    }

    #[test]
    fn expenses_without_income_fill_the_circle() {
        let b = compute(&state("", &[("A", "100"), ("B", "300")]));
        assert_eq!(b.status, Status::Overspent(400.0));
        approx_eq(b.shares[0].percent, 25.0, 1e-9);
        approx_eq(b.shares[1].percent, 75.0, 1e-9);
        assert_eq!(b.savings_ratio, None);
    }

    #[test]
    fn status_tiers_follow_spending_ratio() {
        let tier = |spent: &str| compute(&state("100", &[("A", spent)])).status;
        assert_eq!(tier("0"), Status::UnderControl);
        assert_eq!(tier("50"), Status::UnderControl);
        assert_eq!(tier("50.01"), Status::Elevated);
        assert_eq!(tier("80"), Status::Elevated);
        assert_eq!(tier("80.5"), Status::ApproachingLimit);
        assert_eq!(tier("100"), Status::ApproachingLimit);
        assert_eq!(tier("100.5"), Status::Overspent(0.5));
    }

    #[test]
    fn spending_all_income_leaves_nothing() {
        let b = compute(&state("100", &[("A", "60"), ("B", "40")]));
        assert_eq!(b.overspend, 0.0);
        assert_eq!(b.remaining, 0.0);
        assert_eq!(b.leftover_percent, 0.0);
        approx_eq(b.shares.iter().map(|s| s.percent).sum(), 100.0, 1e-9);
    }

    #[test]
    fn percentages_always_cover_the_circle() {
        let cases: &[(&str, &[(&str, &str)])] = &[
            ("30000", &[("A", "10000"), ("B", "5000")]),
            ("10000", &[("A", "6000"), ("B", "7000")]),
            ("0", &[("A", "1"), ("B", "2"), ("C", "0")]),
            ("777,7", &[("A", "0.3"), ("B", "123.45")]),
            ("1", &[]),
            ("5000", &[("A", "-20"), ("B", "x")]),
        ];
        for (income, categories) in cases {
            let b = compute(&state(income, categories));
            let total: f64 = b.shares.iter().map(|s| s.percent).sum::<f64>() + b.leftover_percent;
            approx_eq(total, 100.0, 1e-9);
        }
    }

    #[test]
    fn negative_values_count_as_zero() {
        let b = compute(&state("-500", &[("A", "-20")]));
        assert_eq!(b.income, 0.0);
        assert_eq!(b.expenses, 0.0);
        assert_eq!(b.status, Status::WaitingForData);
    }

    #[test]
    fn texts_for_a_filled_budget() {
        let texts = compute(&state("30000", &[("Splátky", "10000"), ("Úspory", "5000")]))
            .texts(Currency::Czk);
        assert_eq!(texts.total_expenses, "15\u{a0}000\u{a0}Kč");
        assert_eq!(texts.remaining, "15\u{a0}000\u{a0}Kč");
        assert_eq!(texts.savings_ratio, "16.7 %");
        assert_eq!(texts.headline, "30\u{a0}000\u{a0}Kč");
        assert_eq!(texts.caption, "Měsíční příjem");
        assert_eq!(texts.status, "Výdaje pod kontrolou");
        assert_eq!(texts.tone, Tone::Ok);
    }

    #[test]
    fn texts_use_placeholders_without_data() {
        let texts = Breakdown::default().texts(Currency::Czk);
        assert_eq!(texts.total_expenses, "–");
        assert_eq!(texts.remaining, "–");
        assert_eq!(texts.savings_ratio, "–");
        assert_eq!(texts.headline, "0\u{a0}Kč");
        assert_eq!(texts.caption, "Zadej příjem a výdaje");
        assert_eq!(texts.status, "Čekám na data…");
        assert_eq!(texts.tone, Tone::Warn);

        let texts = compute(&state("", &[("A", "700")])).texts(Currency::Eur);
        assert_eq!(texts.total_expenses, "700\u{a0}€");
        assert_eq!(texts.remaining, "–");
        assert_eq!(texts.headline, "700\u{a0}€");
    }

    #[test]
    fn first_matching_savings_category_is_used() {
        let b = compute(&state("1000", &[("Jídlo", "300"), ("úspory", "100"), ("Úspory 2", "200")]));
        approx_eq(b.savings_ratio.unwrap(), 0.1, 1e-12);
    }
}
