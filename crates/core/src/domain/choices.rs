use serde::{Deserialize, Serialize};

/// Household members that can pay for an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payer {
    Rinat,
    Kolya,
    Nicolas,
}

impl Payer {
    pub const ALL: [Payer; 3] = [Payer::Rinat, Payer::Kolya, Payer::Nicolas];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rinat => "Ринат",
            Self::Kolya => "Коля",
            Self::Nicolas => "Nicolas",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|payer| payer.label() == label.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Revolut,
    Bnp,
    Cash,
    Freedom,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] =
        [PaymentMethod::Revolut, PaymentMethod::Bnp, PaymentMethod::Cash, PaymentMethod::Freedom];

    /// Method assigned when the user skips explicit method selection.
    pub const DEFAULT: PaymentMethod = PaymentMethod::Freedom;

    pub fn label(&self) -> &'static str {
        match self {
            Self::Revolut => "Revolut",
            Self::Bnp => "BNP",
            Self::Cash => "Cash",
            Self::Freedom => "Freedom",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|method| method.label() == label.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Transport,
    Groceries,
    Cafe,
    Goods,
    Housing,
    Documents,
    Telecom,
    Leisure,
    Fees,
    Travel,
    Gifts,
    Sport,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Transport,
        Category::Groceries,
        Category::Cafe,
        Category::Goods,
        Category::Housing,
        Category::Documents,
        Category::Telecom,
        Category::Leisure,
        Category::Fees,
        Category::Travel,
        Category::Gifts,
        Category::Sport,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "Транспорт",
            Self::Groceries => "Продукты",
            Self::Cafe => "Кафе",
            Self::Goods => "Товары",
            Self::Housing => "Жильё",
            Self::Documents => "Документы",
            Self::Telecom => "Связь",
            Self::Leisure => "Досуг",
            Self::Fees => "Комиссия",
            Self::Travel => "Путешествия",
            Self::Gifts => "Подарки",
            Self::Sport => "Спорт",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|category| category.label() == label.trim())
    }
}
