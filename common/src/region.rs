//! Нормализация региона (города)
//!
//! Грубый канонизатор, а не геокодер:
//! trim → нижний регистр → убрать «г.» → убрать дефисы → «ё»→«е» → убрать все пробелы.
//! Порядок шагов фиксирован ради совпадения с историческими выгрузками.

use crate::types::Cell;

/// Сокращение «город», удаляется в любом месте строки
const CITY_PREFIX: &str = "г.";

/// Один проход правил
fn normalize_once(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(CITY_PREFIX, "")
        .replace('-', "")
        .replace('ё', "е")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Нормализовать регион в ключ для сравнения
///
/// Всегда возвращает строку; пустой результат означает «региона нет».
/// Проход повторяется, пока строка меняется: «гг..» или «г -.» после одного
/// прохода снова содержат «г.». Для обычных названий хватает одного прохода.
pub fn normalize_region(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Нормализовать регион из ячейки таблицы (пустая ячейка → пустой ключ)
pub fn normalize_region_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        other => normalize_region(&other.as_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moscow_variants_share_key() {
        for raw in ["г. Москва", "Москва", "москва", " Москва ", "г.Москва", "МОСКВА"] {
            assert_eq!(normalize_region(raw), "москва", "raw: {:?}", raw);
        }
    }

    #[test]
    fn test_hyphen_removed_without_space() {
        assert_eq!(normalize_region("Йошкар-Ола"), "йошкарола");
        assert_eq!(normalize_region("Ростов-на-Дону"), "ростовнадону");
    }

    #[test]
    fn test_yo_mapped_to_ye() {
        assert_eq!(normalize_region("Королёв"), "королев");
        assert_eq!(normalize_region("КОРОЛЁВ"), "королев");
    }

    #[test]
    fn test_internal_whitespace_removed() {
        assert_eq!(normalize_region("Нижний  Новгород"), "нижнийновгород");
        assert_eq!(normalize_region("Нижний\tНовгород"), "нижнийновгород");
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert_eq!(normalize_region(""), "");
        assert_eq!(normalize_region("   "), "");
        assert_eq!(normalize_region("г."), "");
        assert_eq!(normalize_region_cell(&Cell::Empty), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "г. Москва",
            "Йошкар-Ола",
            "гг..",
            "г -.Тверь",
            "  Санкт - Петербург ",
            "Орёл",
            "",
        ];
        for raw in inputs {
            let once = normalize_region(raw);
            assert_eq!(normalize_region(&once), once, "raw: {:?}", raw);
        }
    }

    #[test]
    fn test_prefix_exposed_by_first_pass_is_removed() {
        // один проход дал бы «г.тверь»; повтор убирает открывшийся «г.»
        assert_eq!(normalize_once("г -.Тверь"), "г.тверь");
        assert_eq!(normalize_region("г -.Тверь"), "тверь");
        assert_eq!(normalize_region("гг..Тверь"), "тверь");
    }

    #[test]
    fn test_city_prefix_removed_anywhere() {
        assert_eq!(normalize_region("Московская обл., г. Химки"), "московскаяобл.,химки");
    }

    #[test]
    fn test_numeric_cell_normalized_as_text() {
        assert_eq!(normalize_region_cell(&Cell::Number(42.0)), "42");
    }
}
