//! 閉じた語彙（カテゴリ・スタイル・季節・シルエット）
//!
//! AIとの入出力および永続化データで使うラベルはここで一元管理する。
//! ラベル文字列そのものが外部契約なので変更しないこと。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 大カテゴリ（8種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Parte de Cima")]
    Top,
    #[serde(rename = "Parte de Baixo")]
    Bottom,
    #[serde(rename = "Vestidos e Macacões")]
    Dress,
    #[serde(rename = "Sobreposição")]
    Outerwear,
    #[serde(rename = "Calçados")]
    Shoes,
    #[serde(rename = "Acessórios")]
    Accessories,
    #[serde(rename = "Moda Íntima e Praia")]
    IntimatesAndBeach,
    #[serde(rename = "Esportivo")]
    Sportswear,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Top,
        Category::Bottom,
        Category::Dress,
        Category::Outerwear,
        Category::Shoes,
        Category::Accessories,
        Category::IntimatesAndBeach,
        Category::Sportswear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Top => "Parte de Cima",
            Category::Bottom => "Parte de Baixo",
            Category::Dress => "Vestidos e Macacões",
            Category::Outerwear => "Sobreposição",
            Category::Shoes => "Calçados",
            Category::Accessories => "Acessórios",
            Category::IntimatesAndBeach => "Moda Íntima e Praia",
            Category::Sportswear => "Esportivo",
        }
    }

    /// カテゴリに属する小カテゴリ一覧（推奨値、強制はしない）
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Category::Top => &[
                "Camisetas", "Camisas", "Blusas", "Regatas", "Croppeds", "Jaquetas", "Casacos",
                "Suéteres", "Cardigãs",
            ],
            Category::Bottom => &[
                "Calças Jeans", "Calças Alfaiataria", "Leggings", "Calças de Moletom", "Shorts",
                "Bermudas", "Saias",
            ],
            Category::Dress => &[
                "Vestidos Curtos", "Vestidos Midi", "Vestidos Longos", "Macacões", "Macaquinhos",
            ],
            Category::Outerwear => &["Blazers", "Coletes", "Kimonos", "Trench Coats", "Sobretudos"],
            Category::Shoes => &[
                "Tênis", "Sapatos Sociais", "Botas", "Sandálias", "Sapatilhas", "Chinelos",
            ],
            Category::Accessories => &[
                "Bolsas", "Cintos", "Chapéus", "Bonés", "Lenços", "Echarpes", "Óculos",
            ],
            Category::IntimatesAndBeach => &["Lingerie", "Pijamas", "Biquínios", "Maiôs"],
            Category::Sportswear => &[
                "Roupas de Academia", "Roupas de Banho Esportivas", "Tênis Esportivos",
            ],
        }
    }

    pub fn has_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories().contains(&subcategory)
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

/// スタイル（6種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Casual,
    Elegante,
    Boho,
    Streetwear,
    Minimalista,
    Esportivo,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Casual,
        Style::Elegante,
        Style::Boho,
        Style::Streetwear,
        Style::Minimalista,
        Style::Esportivo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Style::Casual => "Casual",
            Style::Elegante => "Elegante",
            Style::Boho => "Boho",
            Style::Streetwear => "Streetwear",
            Style::Minimalista => "Minimalista",
            Style::Esportivo => "Esportivo",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.label()).collect()
    }
}

/// 季節（4季 + 通年）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "Primavera")]
    Spring,
    #[serde(rename = "Verão")]
    Summer,
    #[serde(rename = "Outono")]
    Autumn,
    #[serde(rename = "Inverno")]
    Winter,
    #[serde(rename = "Todo ano")]
    AllYear,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
        Season::AllYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Primavera",
            Season::Summer => "Verão",
            Season::Autumn => "Outono",
            Season::Winter => "Inverno",
            Season::AllYear => "Todo ano",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.label()).collect()
    }
}

/// シルエット候補（fit自体は自由入力）
pub const FITS: &[&str] = &[
    "Justo",
    "Solto",
    "Oversized",
    "Estruturado",
    "Fluído",
    "Slim",
    "Regular",
];

macro_rules! impl_label_traits {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().to_lowercase() == wanted)
                    .ok_or_else(|| format!("Unknown {}: {}", $what, s))
            }
        }
    };
}

impl_label_traits!(Category, "category");
impl_label_traits!(Style, "style");
impl_label_traits!(Season, "season");
