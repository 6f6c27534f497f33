// src/common/dates.rs

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Weekday};

const NO_DATE: &str = "-";

/// Idiomas suportados na formatação de datas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateLocale {
    #[default]
    PtBr,
    En,
}

impl DateLocale {
    /// Recebe o idioma primário ("pt", "en"...). Qualquer outro cai no padrão pt-BR.
    pub fn from_language(lang: &str) -> Self {
        match lang.to_ascii_lowercase().as_str() {
            "en" => DateLocale::En,
            _ => DateLocale::PtBr,
        }
    }

    fn short_date(self, date: NaiveDate) -> String {
        match self {
            DateLocale::PtBr => date.format("%d/%m/%Y").to_string(),
            DateLocale::En => date.format("%-m/%-d/%Y").to_string(),
        }
    }

    fn weekday_long(self, weekday: Weekday) -> &'static str {
        match self {
            DateLocale::PtBr => match weekday {
                Weekday::Sun => "domingo",
                Weekday::Mon => "segunda-feira",
                Weekday::Tue => "terça-feira",
                Weekday::Wed => "quarta-feira",
                Weekday::Thu => "quinta-feira",
                Weekday::Fri => "sexta-feira",
                Weekday::Sat => "sábado",
            },
            DateLocale::En => match weekday {
                Weekday::Sun => "Sunday",
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
            },
        }
    }

    // Forma curta "crua" do idioma, ainda com pontuação.
    fn weekday_short(self, weekday: Weekday) -> &'static str {
        match self {
            DateLocale::PtBr => match weekday {
                Weekday::Sun => "dom.",
                Weekday::Mon => "seg.",
                Weekday::Tue => "ter.",
                Weekday::Wed => "qua.",
                Weekday::Thu => "qui.",
                Weekday::Fri => "sex.",
                Weekday::Sat => "sáb.",
            },
            DateLocale::En => match weekday {
                Weekday::Sun => "Sun",
                Weekday::Mon => "Mon",
                Weekday::Tue => "Tue",
                Weekday::Wed => "Wed",
                Weekday::Thu => "Thu",
                Weekday::Fri => "Fri",
                Weekday::Sat => "Sat",
            },
        }
    }
}

/// Qualquer coisa que possa ser vista como uma data de calendário (sem hora).
pub trait CalendarDate {
    fn calendar_date(&self) -> Option<NaiveDate>;
}

impl CalendarDate for str {
    fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date_input(self)
    }
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> Option<NaiveDate> {
        Some(self.date_naive())
    }
}

impl<T: CalendarDate + ?Sized> CalendarDate for &T {
    fn calendar_date(&self) -> Option<NaiveDate> {
        (**self).calendar_date()
    }
}

impl<T: CalendarDate> CalendarDate for Option<T> {
    fn calendar_date(&self) -> Option<NaiveDate> {
        self.as_ref().and_then(CalendarDate::calendar_date)
    }
}

/// Converte "YYYY-MM-DD" direto em data de calendário, sem passar por fuso horário.
/// Outros formatos caem no parser de timestamp (RFC 3339 / RFC 2822).
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }

    let parts: Vec<&str> = value.split('-').collect();
    if let [year, month, day] = parts.as_slice() {
        if let (Ok(year), Ok(month), Ok(day)) = (
            year.trim().parse::<i32>(),
            month.trim().parse::<u32>(),
            day.trim().parse::<u32>(),
        ) {
            return NaiveDate::from_ymd_opt(year, month, day);
        }
    }

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Data curta do idioma (pt-BR: 05/03/2024). Sem data válida: "-".
pub fn format_date<D: CalendarDate + ?Sized>(value: &D, locale: DateLocale) -> String {
    value
        .calendar_date()
        .map(|date| locale.short_date(date))
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Dia da semana por extenso ("terça-feira"). Sem data válida: string vazia.
pub fn weekday_long<D: CalendarDate + ?Sized>(value: &D, locale: DateLocale) -> String {
    value
        .calendar_date()
        .map(|date| locale.weekday_long(date.weekday()).to_string())
        .unwrap_or_default()
}

/// Dia da semana abreviado, sem pontos e com a inicial maiúscula ("Ter").
pub fn weekday_short<D: CalendarDate + ?Sized>(value: &D, locale: DateLocale) -> String {
    value
        .calendar_date()
        .map(|date| capitalize(&locale.weekday_short(date.weekday()).replace('.', "")))
        .unwrap_or_default()
}

/// "05/03/2024 (Ter)", como aparece na tabela de registros.
pub fn date_with_weekday<D: CalendarDate + ?Sized>(value: &D, locale: DateLocale) -> String {
    let formatted = format_date(value, locale);
    if formatted == NO_DATE {
        return formatted;
    }
    format!("{} ({})", formatted, weekday_short(value, locale))
}

/// Hoje, no fuso da máquina.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
