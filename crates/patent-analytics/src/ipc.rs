//! Classification code resolution.
//!
//! Maps hierarchical IPC codes to human-readable descriptions through a
//! longest-match cascade over static tables. The tables ship with the
//! binary, are never mutated at runtime, and may be extended without
//! touching the lookup algorithm.

/// Prefix lengths tried after a verbatim lookup fails, most specific first.
const PREFIX_LENGTHS: [usize; 4] = [6, 5, 4, 3];

/// Code-to-description table, sorted by code for binary search.
///
/// Keys mix granularities: full codes, main groups, subclasses and
/// classes all live in one table because every cascade step is an exact
/// lookup of a progressively shorter prefix.
static DESCRIPTIONS: &[(&str, &str)] = &[
    ("A61", "Медицина и ветеринария; гигиена"),
    ("A61B", "Диагностика; хирургия; опознание личности"),
    (
        "A61K",
        "Лекарства и медикаменты для терапевтических, стоматологических или гигиенических целей",
    ),
    ("B25J", "Манипуляторы; камеры с манипуляторами"),
    ("B60", "Транспортные средства общего назначения"),
    ("C07", "Органическая химия"),
    ("C12N", "Микроорганизмы или ферменты; их композиции"),
    ("E04", "Строительство зданий"),
    ("F16", "Узлы и детали машин"),
    ("G01", "Измерение; испытание"),
    (
        "G01N",
        "Исследование или анализ материалов путем определения их химических или физических свойств",
    ),
    ("G05", "Управление; регулирование"),
    ("G05B", "Системы управления или регулирования общего назначения"),
    ("G06", "Вычисления; счет"),
    ("G06F", "Обработка цифровых данных с помощью электрических устройств"),
    ("G06F1", "Конструктивные элементы устройств обработки данных"),
    ("G06F17", "Цифровые вычислительные машины или аналогичные устройства"),
    ("G06F17/30", "Информационный поиск; структуры баз данных"),
    (
        "G06F21",
        "Защита компьютеров, их компонентов, программ или данных от несанкционированной деятельности",
    ),
    ("G06F40", "Обработка данных на естественном языке"),
    ("G06K", "Распознавание и представление данных; носители записи"),
    (
        "G06N",
        "Вычислительные системы, основанные на специфических вычислительных моделях",
    ),
    ("G06N20", "Машинное обучение"),
    ("G06N3", "Вычислительные системы, основанные на биологических моделях"),
    ("G06N3/02", "Вычислительные системы, основанные на моделях нейронных сетей"),
    ("G06N3/08", "Способы обучения нейронных сетей"),
    (
        "G06Q",
        "Системы обработки данных для административных, коммерческих, финансовых или управленческих целей",
    ),
    ("G06T", "Обработка или генерация данных изображения"),
    ("G06V", "Распознавание или понимание образов"),
    ("G08", "Сигнализация"),
    ("G10L", "Анализ или синтез речи; распознавание речи"),
    (
        "G16",
        "Информационно-коммуникационные технологии для специальных областей применения",
    ),
    ("H01", "Основные элементы электрического оборудования"),
    (
        "H02",
        "Производство, преобразование и распределение электрической энергии",
    ),
    ("H03", "Электронные схемы общего назначения"),
    ("H04", "Техника электрической связи"),
    ("H04L", "Передача цифровой информации, например телеграфная связь"),
    ("H04L12", "Сети передачи данных с коммутацией"),
    ("H04L9", "Устройства для секретной или защищенной связи; сетевая безопасность"),
    ("H04M", "Телефонная связь"),
    ("H04N", "Передача изображений, например телевидение"),
    ("H04W", "Сети беспроводной связи"),
];

/// Top-level section table, one entry per IPC section letter.
static SECTIONS: &[(&str, &str)] = &[
    ("A", "Удовлетворение жизненных потребностей человека"),
    ("B", "Различные технологические процессы; транспортирование"),
    ("C", "Химия; металлургия"),
    ("D", "Текстиль; бумага"),
    ("E", "Строительство; горное дело"),
    (
        "F",
        "Машиностроение; освещение; отопление; двигатели и насосы; оружие и боеприпасы; взрывные работы",
    ),
    ("G", "Физика"),
    ("H", "Электричество"),
];

/// Resolve a classification code to a human-readable description.
///
/// Tries the normalized code verbatim, then its 6-, 5-, 4- and 3-character
/// prefixes, stopping at the first table hit. When only the section letter
/// matches, the result is `"{section description} ({code})"`. Unknown codes
/// resolve to `None`; resolution never fails.
///
/// # Arguments
/// * `code` - A hierarchical code such as `G06F17/16`, in any letter case,
///   with or without interior whitespace
pub fn resolve(code: &str) -> Option<String> {
    let normalized = normalize(code);
    if normalized.is_empty() {
        return None;
    }

    if let Some(description) = find(DESCRIPTIONS, &normalized) {
        return Some(description.to_string());
    }

    for len in PREFIX_LENGTHS {
        // get() rather than slicing: never panic on short or non-ASCII input
        if let Some(prefix) = normalized.get(..len) {
            if let Some(description) = find(DESCRIPTIONS, prefix) {
                return Some(description.to_string());
            }
        }
    }

    if let Some(section) = normalized
        .get(..1)
        .and_then(|letter| find(SECTIONS, letter))
    {
        return Some(format!("{section} ({normalized})"));
    }

    None
}

/// Resolve only the top-level section of a code.
pub fn section(code: &str) -> Option<&'static str> {
    let normalized = normalize(code);
    normalized.get(..1).and_then(|letter| find(SECTIONS, letter))
}

/// Strip whitespace and uppercase ASCII letters, e.g. `"g06f 17/16"`
/// becomes `"G06F17/16"`.
///
/// Resolution applies this internally; callers that compare codes
/// against record codes should normalize both sides the same way.
pub fn normalize(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn find(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .binary_search_by_key(&key, |entry| entry.0)
        .ok()
        .map(|index| table[index].1)
}
