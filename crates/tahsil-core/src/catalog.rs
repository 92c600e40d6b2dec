//! Built-in curricula and optional extra subjects.

use crate::error::GradeError;
use crate::model::{Level, Stream, Subject};

type Row = (&'static str, &'static str, f64);

const MATH: &str = "Mathématiques";
const PC: &str = "Physique-Chimie";
const SVT: &str = "SVT";
const PHILO: &str = "Philosophie";
const ENG: &str = "Anglais";
const ARABIC: &str = "Arabe";
const FRENCH: &str = "Français";
const ISLAMIC: &str = "Éducation islamique";
const HISTORY: &str = "Histoire-Géographie";

/// Language and humanities subjects shared by every second-year stream.
const SECOND_BAC_COMMON: &[Row] = &[
    ("philo", PHILO, 2.0),
    ("eng", ENG, 2.0),
    ("arabic", ARABIC, 2.0),
    ("french", FRENCH, 4.0),
    ("islamic", ISLAMIC, 2.0),
    ("history", HISTORY, 2.0),
];

const FIRST_BAC_REGIONAL: &[Row] = &[
    ("arabic", ARABIC, 2.0),
    ("french", FRENCH, 4.0),
    ("history", HISTORY, 2.0),
    ("islamic", ISLAMIC, 2.0),
];

const EXTRA_SUBJECTS: &[Row] = &[
    ("info", "Informatique", 2.0),
    ("trans", "Traduction", 2.0),
    ("sport_supp", "Éducation physique (complémentaire)", 4.0),
    ("lang_3", "Troisième langue étrangère", 2.0),
    ("arts", "Arts plastiques", 1.0),
    ("music", "Éducation musicale", 1.0),
    ("assiduite", "Assiduité et conduite", 1.0),
];

fn subjects(rows: &[Row]) -> Vec<Subject> {
    rows.iter()
        .map(|(id, name, coefficient)| Subject::new(*id, *name, *coefficient))
        .collect()
}

fn second_bac(id: &str, name: &str, sciences: &[Row], national: &[Row]) -> Stream {
    let mut list = subjects(sciences);
    list.extend(subjects(SECOND_BAC_COMMON));
    Stream {
        id: id.into(),
        name: name.into(),
        level: Level::SecondBac,
        subjects: list,
        national_exam_subjects: subjects(national),
        regional_exam_subjects: Vec::new(),
    }
}

fn first_bac(id: &str, name: &str, rows: &[Row]) -> Stream {
    Stream {
        id: id.into(),
        name: name.into(),
        level: Level::FirstBac,
        subjects: subjects(rows),
        national_exam_subjects: Vec::new(),
        regional_exam_subjects: subjects(FIRST_BAC_REGIONAL),
    }
}

fn second_bac_streams() -> Vec<Stream> {
    vec![
        second_bac(
            "pc",
            "Sciences physiques (PC)",
            &[("math", MATH, 7.0), ("pc", PC, 7.0), ("svt", SVT, 5.0)],
            &[
                ("math", MATH, 7.0),
                ("pc", PC, 7.0),
                ("svt", SVT, 5.0),
                ("philo", PHILO, 2.0),
                ("eng", ENG, 2.0),
            ],
        ),
        second_bac(
            "svt",
            "Sciences de la vie et de la terre (SVT)",
            &[("math", MATH, 7.0), ("svt", SVT, 7.0), ("pc", PC, 5.0)],
            &[
                ("svt", SVT, 7.0),
                ("math", MATH, 7.0),
                ("pc", PC, 5.0),
                ("philo", PHILO, 2.0),
                ("eng", ENG, 2.0),
            ],
        ),
        second_bac(
            "sci_math",
            "Sciences mathématiques",
            &[("math", MATH, 9.0), ("pc", PC, 7.0), ("svt", SVT, 3.0)],
            &[
                ("math", MATH, 9.0),
                ("pc", PC, 7.0),
                ("philo", PHILO, 2.0),
                ("eng", ENG, 2.0),
            ],
        ),
        second_bac(
            "eco",
            "Sciences économiques",
            &[
                ("math", MATH, 4.0),
                ("eco", "Économie générale et statistiques", 6.0),
                ("management", "Organisation et comptabilité", 6.0),
            ],
            &[
                ("eco", "Économie générale et statistiques", 6.0),
                ("management", "Organisation et comptabilité", 6.0),
                ("math", MATH, 4.0),
                ("philo", PHILO, 2.0),
                ("eng", ENG, 2.0),
            ],
        ),
    ]
}

fn first_bac_streams() -> Vec<Stream> {
    vec![
        first_bac(
            "sci_ex",
            "Sciences expérimentales (1ère bac)",
            &[
                ("math", MATH, 7.0),
                ("pc", PC, 7.0),
                ("svt", SVT, 7.0),
                ("arabic", ARABIC, 2.0),
                ("french", FRENCH, 4.0),
                ("eng", ENG, 2.0),
                ("philo", PHILO, 2.0),
                ("islamic", ISLAMIC, 2.0),
                ("history", HISTORY, 2.0),
            ],
        ),
        first_bac(
            "sci_math_1bac",
            "Sciences mathématiques (1ère bac)",
            &[
                ("math", MATH, 9.0),
                ("pc", PC, 7.0),
                ("svt", SVT, 3.0),
                ("philo", PHILO, 2.0),
                ("arabic", ARABIC, 2.0),
                ("french", FRENCH, 4.0),
                ("eng", ENG, 2.0),
                ("islamic", ISLAMIC, 2.0),
                ("history", HISTORY, 2.0),
                ("pe", "Éducation physique", 1.0),
                ("attendance", "Assiduité et conduite", 1.0),
            ],
        ),
    ]
}

/// Built-in streams of a level. Custom curricula have none.
pub fn streams(level: Level) -> Vec<Stream> {
    match level {
        Level::FirstBac => first_bac_streams(),
        Level::SecondBac => second_bac_streams(),
        Level::Custom => Vec::new(),
    }
}

/// Every built-in stream, first-year streams first.
pub fn all_streams() -> Vec<Stream> {
    let mut all = first_bac_streams();
    all.extend(second_bac_streams());
    all
}

/// Look up a built-in stream by id.
pub fn find_stream(id: &str) -> Result<Stream, GradeError> {
    all_streams()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| GradeError::UnknownStream(id.to_string()))
}

/// Optional subjects a student may add on top of a stream.
pub fn extra_subjects() -> Vec<Subject> {
    subjects(EXTRA_SUBJECTS)
}

/// An extra subject, with an optional coefficient override.
///
/// A non-positive or non-finite override keeps the catalog coefficient.
pub fn extra_subject(id: &str, coefficient: Option<f64>) -> Result<Subject, GradeError> {
    let mut subject = extra_subjects()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| GradeError::UnknownSubject(id.to_string()))?;
    if let Some(c) = coefficient.filter(|c| c.is_finite() && *c > 0.0) {
        subject.coefficient = c;
    }
    Ok(subject)
}
