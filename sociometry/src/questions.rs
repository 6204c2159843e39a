use std::fmt::Display;
use std::str::FromStr;

use crate::config::SociometryError;

/// The school level of the class. Each level has its own questionnaire.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum SchoolLevel {
    /// Early childhood education.
    Paud,
    /// Primary school.
    Sd,
    /// Junior high school.
    Smp,
    /// Senior high school.
    Sma,
}

const PAUD_QUESTIONS: [&str; 6] = [
    "Siapa teman yang paling enak diajak ngobrol atau bercerita?",
    "Siapa teman yang suka bantu kamu kalau kamu sedih atau takut?",
    "Kalau main bareng, siapa teman yang bisa tenang dan nggak mudah marah?",
    "Siapa teman yang paling kamu percaya buat jadi pemimpin permainan atau kegiatan?",
    "Kalau kita jalan-jalan atau main di luar, kamu paling suka bareng siapa?",
    "Siapa teman yang sering salat, berdoa, atau bantu beresin mainan menurut kamu?",
];

const SD_QUESTIONS: [&str; 6] = [
    "Siapa teman yang sering bermain bersama kamu saat istirahat?",
    "Siapa teman yang kamu percaya saat kerja kelompok?",
    "Siapa teman yang selalu menghiburmu saat sedih?",
    "Siapa teman yang kamu sukai karena jujur dan adil?",
    "Siapa teman yang aktif dan suka membantu guru?",
    "Siapa teman yang bisa menenangkan saat marah?",
];

const SMP_QUESTIONS: [&str; 6] = [
    "Siapa teman yang bisa kamu ajak diskusi serius?",
    "Siapa teman yang menurutmu memiliki jiwa kepemimpinan?",
    "Siapa teman yang tidak menyebarkan gosip dan bisa dipercaya?",
    "Siapa teman yang menunjukkan empati saat kamu dalam masalah?",
    "Siapa teman yang paling kamu hormati karena karakternya?",
    "Siapa teman yang berani membela temannya saat dibully?",
];

const SMA_QUESTIONS: [&str; 6] = [
    "Siapa teman yang kamu anggap paling suportif?",
    "Siapa teman yang bisa kamu jadikan partner belajar?",
    "Siapa teman yang paling aktif di kegiatan sosial sekolah?",
    "Siapa teman yang bisa dipercaya menjaga rahasia?",
    "Siapa teman yang mampu memimpin dengan bijaksana?",
    "Siapa teman yang menurutmu punya integritas tinggi?",
];

impl SchoolLevel {
    pub const ALL: [SchoolLevel; 4] = [
        SchoolLevel::Paud,
        SchoolLevel::Sd,
        SchoolLevel::Smp,
        SchoolLevel::Sma,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            SchoolLevel::Paud => "PAUD",
            SchoolLevel::Sd => "SD",
            SchoolLevel::Smp => "SMP",
            SchoolLevel::Sma => "SMA",
        }
    }

    /// The sociometry questions asked at this level, in order.
    pub fn questions(&self) -> &'static [&'static str] {
        match self {
            SchoolLevel::Paud => &PAUD_QUESTIONS,
            SchoolLevel::Sd => &SD_QUESTIONS,
            SchoolLevel::Smp => &SMP_QUESTIONS,
            SchoolLevel::Sma => &SMA_QUESTIONS,
        }
    }
}

impl FromStr for SchoolLevel {
    type Err = SociometryError;

    fn from_str(s: &str) -> Result<SchoolLevel, SociometryError> {
        let code = s.trim();
        SchoolLevel::ALL
            .iter()
            .find(|level| level.code().eq_ignore_ascii_case(code))
            .cloned()
            .ok_or_else(|| SociometryError::UnknownSchoolLevel(s.to_string()))
    }
}

impl Display for SchoolLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels() {
        assert_eq!("SMP".parse::<SchoolLevel>(), Ok(SchoolLevel::Smp));
        assert_eq!(" paud ".parse::<SchoolLevel>(), Ok(SchoolLevel::Paud));
        assert_eq!(
            "TK".parse::<SchoolLevel>(),
            Err(SociometryError::UnknownSchoolLevel("TK".to_string()))
        );
    }

    #[test]
    fn six_questions_per_level() {
        for level in SchoolLevel::ALL {
            assert_eq!(level.questions().len(), 6, "{}", level);
            assert_eq!(level.code().parse::<SchoolLevel>(), Ok(level));
        }
    }
}
