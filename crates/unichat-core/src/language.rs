//! Supported interface languages and their suggestion phrase lists

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language selectable in the chat interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
    Ar,
    Fr,
    Ur,
    Fa,
}

const EN_PHRASES: &[&str] = &[
    "What are the admission requirements?",
    "When does the semester start?",
    "Who is Dr.",
    "Where is the library?",
    "How do I register for courses?",
    "What scholarships are available?",
    "What are the tuition fees?",
    "How can I contact the registrar?",
    "Where is the student affairs office?",
    "What programs does the university offer?",
    "When is the exam schedule published?",
    "How do I apply for a dormitory?",
];

const TR_PHRASES: &[&str] = &[
    "Kabul şartları nelerdir?",
    "Dönem ne zaman başlıyor?",
    "Dr. kimdir",
    "Kütüphane nerede?",
    "Derslere nasıl kayıt olurum?",
    "Hangi burslar mevcut?",
    "Öğrenim ücretleri ne kadar?",
    "Öğrenci işlerine nasıl ulaşırım?",
    "Yurt başvurusu nasıl yapılır?",
    "Sınav takvimi ne zaman açıklanır?",
];

const AR_PHRASES: &[&str] = &[
    "ما هي شروط القبول؟",
    "متى يبدأ الفصل الدراسي؟",
    "من هو الدكتور",
    "أين المكتبة؟",
    "كيف أسجل في المقررات؟",
    "ما هي المنح الدراسية المتاحة؟",
    "كم تبلغ الرسوم الدراسية؟",
    "كيف أتواصل مع شؤون الطلاب؟",
    "كيف أتقدم للسكن الجامعي؟",
    "متى يُنشر جدول الامتحانات؟",
];

const FR_PHRASES: &[&str] = &[
    "Quelles sont les conditions d'admission ?",
    "Quand commence le semestre ?",
    "Qui est le Dr.",
    "Où se trouve la bibliothèque ?",
    "Comment m'inscrire aux cours ?",
    "Quelles bourses sont disponibles ?",
    "Quels sont les frais de scolarité ?",
    "Comment contacter le service de scolarité ?",
    "Comment demander un logement étudiant ?",
    "Quand le calendrier des examens est-il publié ?",
];

const UR_PHRASES: &[&str] = &[
    "داخلے کی شرائط کیا ہیں؟",
    "سمسٹر کب شروع ہوتا ہے؟",
    "ڈاکٹر کون ہیں",
    "لائبریری کہاں ہے؟",
    "کورسز میں رجسٹریشن کیسے کروں؟",
    "کون سی اسکالرشپس دستیاب ہیں؟",
    "ٹیوشن فیس کتنی ہے؟",
    "ہاسٹل کے لیے درخواست کیسے دوں؟",
    "امتحانات کا شیڈول کب جاری ہوگا؟",
];

const FA_PHRASES: &[&str] = &[
    "شرایط پذیرش چیست؟",
    "ترم چه زمانی شروع می‌شود؟",
    "دکتر چه کسی است",
    "کتابخانه کجاست؟",
    "چگونه برای دروس ثبت‌نام کنم؟",
    "چه بورسیه‌هایی موجود است؟",
    "شهریه چقدر است؟",
    "چگونه برای خوابگاه درخواست بدهم؟",
    "برنامه امتحانات کی منتشر می‌شود؟",
];

impl Language {
    /// All selectable languages in display order
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Tr,
        Language::Ar,
        Language::Fr,
        Language::Ur,
        Language::Fa,
    ];

    /// Parse a language code. Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "en" => Language::En,
            "tr" => Language::Tr,
            "ar" => Language::Ar,
            "fr" => Language::Fr,
            "ur" => Language::Ur,
            "fa" => Language::Fa,
            _ => Language::En,
        }
    }

    /// Wire code sent to the backend
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
            Language::Ar => "ar",
            Language::Fr => "fr",
            Language::Ur => "ur",
            Language::Fa => "fa",
        }
    }

    /// Human readable name in the language itself
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Tr => "Türkçe",
            Language::Ar => "العربية",
            Language::Fr => "Français",
            Language::Ur => "اردو",
            Language::Fa => "فارسی",
        }
    }

    /// Whether the language is written right-to-left
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar | Language::Ur | Language::Fa)
    }

    /// Fixed suggestion phrases for this language
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Language::En => EN_PHRASES,
            Language::Tr => TR_PHRASES,
            Language::Ar => AR_PHRASES,
            Language::Fr => FR_PHRASES,
            Language::Ur => UR_PHRASES,
            Language::Fa => FA_PHRASES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), lang);
        }
        assert_eq!(Language::from_code(" TR "), Language::Tr);
    }

    #[test]
    fn test_from_code_unknown_falls_back() {
        assert_eq!(Language::from_code("de"), Language::En);
        assert_eq!(Language::from_code(""), Language::En);
    }

    #[test]
    fn test_every_language_has_phrases() {
        for lang in Language::ALL {
            assert!(!lang.phrases().is_empty(), "{} has no phrases", lang);
        }
    }

    #[test]
    fn test_rtl() {
        assert!(Language::Ar.is_rtl());
        assert!(!Language::Fr.is_rtl());
    }
}
