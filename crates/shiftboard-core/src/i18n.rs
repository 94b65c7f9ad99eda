use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum Language {
  #[default]
  En,
  De,
  Es,
  Fr
}

impl Language {
  pub fn from_code(
    code: &str
  ) -> Option<Self> {
    match code
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "en" => Some(Self::En),
      | "de" => Some(Self::De),
      | "es" => Some(Self::Es),
      | "fr" => Some(Self::Fr),
      | _ => None
    }
  }

  // "de-DE" -> de, "xx-YY" -> en
  pub fn from_locale(
    locale: &str
  ) -> Self {
    let primary = locale
      .split(['-', '_'])
      .next()
      .unwrap_or_default();
    match Self::from_code(primary) {
      | Some(language) => language,
      | None => {
        tracing::warn!(
          locale,
          "unsupported locale; using \
           english strings"
        );
        Self::default()
      }
    }
  }

  pub fn code(self) -> &'static str {
    match self {
      | Self::En => "en",
      | Self::De => "de",
      | Self::Es => "es",
      | Self::Fr => "fr"
    }
  }

  pub fn table(self) -> Translations {
    match self {
      | Self::En => ENGLISH,
      | Self::De => GERMAN,
      | Self::Es => SPANISH,
      | Self::Fr => FRENCH
    }
  }

  pub fn month_name(
    self,
    month: u32
  ) -> &'static str {
    let names = match self {
      | Self::En => &EN_MONTHS,
      | Self::De => &DE_MONTHS,
      | Self::Es => &ES_MONTHS,
      | Self::Fr => &FR_MONTHS
    };
    names[month_index(month)]
  }

  pub fn month_abbrev(
    self,
    month: u32
  ) -> String {
    self
      .month_name(month)
      .chars()
      .take(3)
      .collect()
  }

  pub fn weekday_name(
    self,
    weekday: chrono::Weekday
  ) -> &'static str {
    let names = match self {
      | Self::En => &EN_WEEKDAYS,
      | Self::De => &DE_WEEKDAYS,
      | Self::Es => &ES_WEEKDAYS,
      | Self::Fr => &FR_WEEKDAYS
    };
    names[weekday.num_days_from_monday()
      as usize]
  }

  pub fn weekday_abbrev(
    self,
    weekday: chrono::Weekday
  ) -> String {
    self
      .weekday_name(weekday)
      .chars()
      .take(2)
      .collect()
  }
}

fn month_index(month: u32) -> usize {
  (month.clamp(1, 12) - 1) as usize
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
  pub view: Cow<'static, str>,
  pub period: Cow<'static, str>,
  pub calendar: Cow<'static, str>,
  pub timeline: Cow<'static, str>,
  pub day: Cow<'static, str>,
  pub week: Cow<'static, str>,
  pub month: Cow<'static, str>,
  pub year: Cow<'static, str>,
  pub today: Cow<'static, str>,
  pub new_item: Cow<'static, str>,
  pub add: Cow<'static, str>,
  pub no_items_for_day: Cow<'static, str>,
  pub no_items: Cow<'static, str>,
  pub timeline_mobile_message:
    Cow<'static, str>,
  pub more_items: Cow<'static, str>,
  pub all_day: Cow<'static, str>,
  pub event: Cow<'static, str>,
  pub meeting: Cow<'static, str>,
  pub task: Cow<'static, str>,
  #[serde(rename = "break")]
  pub break_time: Cow<'static, str>,
  pub vacation: Cow<'static, str>,
  pub holiday: Cow<'static, str>,
  pub sick_leave: Cow<'static, str>
}

impl Translations {
  fn slot_mut(
    &mut self,
    key: &str
  ) -> Option<&mut Cow<'static, str>> {
    let slot = match key {
      | "view" => &mut self.view,
      | "period" => &mut self.period,
      | "calendar" => &mut self.calendar,
      | "timeline" => &mut self.timeline,
      | "day" => &mut self.day,
      | "week" => &mut self.week,
      | "month" => &mut self.month,
      | "year" => &mut self.year,
      | "today" => &mut self.today,
      | "newItem" => &mut self.new_item,
      | "add" => &mut self.add,
      | "noItemsForDay" => {
        &mut self.no_items_for_day
      }
      | "noItems" => &mut self.no_items,
      | "timelineMobileMessage" => {
        &mut self.timeline_mobile_message
      }
      | "moreItems" => {
        &mut self.more_items
      }
      | "allDay" => &mut self.all_day,
      | "event" => &mut self.event,
      | "meeting" => &mut self.meeting,
      | "task" => &mut self.task,
      | "break" => &mut self.break_time,
      | "vacation" => &mut self.vacation,
      | "holiday" => &mut self.holiday,
      | "sickLeave" => {
        &mut self.sick_leave
      }
      | _ => return None
    };
    Some(slot)
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    let value = match key {
      | "view" => &self.view,
      | "period" => &self.period,
      | "calendar" => &self.calendar,
      | "timeline" => &self.timeline,
      | "day" => &self.day,
      | "week" => &self.week,
      | "month" => &self.month,
      | "year" => &self.year,
      | "today" => &self.today,
      | "newItem" => &self.new_item,
      | "add" => &self.add,
      | "noItemsForDay" => {
        &self.no_items_for_day
      }
      | "noItems" => &self.no_items,
      | "timelineMobileMessage" => {
        &self.timeline_mobile_message
      }
      | "moreItems" => &self.more_items,
      | "allDay" => &self.all_day,
      | "event" => &self.event,
      | "meeting" => &self.meeting,
      | "task" => &self.task,
      | "break" => &self.break_time,
      | "vacation" => &self.vacation,
      | "holiday" => &self.holiday,
      | "sickLeave" => &self.sick_leave,
      | _ => return None
    };
    Some(value.as_ref())
  }

  pub fn apply_overrides(
    &mut self,
    overrides: &BTreeMap<String, String>
  ) {
    for (key, value) in overrides {
      match self.slot_mut(key) {
        | Some(slot) => {
          *slot = Cow::Owned(value.clone());
        }
        | None => {
          tracing::warn!(
            key = %key,
            "ignoring unknown translation \
             key"
          );
        }
      }
    }
  }

  // Label of a built-in item type key, if it has one.
  pub fn item_type_label(
    &self,
    item_type: &str
  ) -> Option<&str> {
    let key = match item_type {
      | "default" => "event",
      | "sick" => "sickLeave",
      | other => other
    };
    match key {
      | "event" | "meeting" | "task"
      | "break" | "vacation"
      | "holiday" | "sickLeave" => {
        self.get(key)
      }
      | _ => None
    }
  }
}

#[tracing::instrument(skip(overrides))]
pub fn resolve_translations(
  locale: &str,
  overrides: &BTreeMap<String, String>
) -> Translations {
  let language =
    Language::from_locale(locale);
  let mut table = language.table();
  table.apply_overrides(overrides);
  tracing::debug!(
    language = language.code(),
    overrides = overrides.len(),
    "resolved translations"
  );
  table
}

const EN_MONTHS: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

const DE_MONTHS: [&str; 12] = [
  "Januar",
  "Februar",
  "März",
  "April",
  "Mai",
  "Juni",
  "Juli",
  "August",
  "September",
  "Oktober",
  "November",
  "Dezember"
];

const ES_MONTHS: [&str; 12] = [
  "enero",
  "febrero",
  "marzo",
  "abril",
  "mayo",
  "junio",
  "julio",
  "agosto",
  "septiembre",
  "octubre",
  "noviembre",
  "diciembre"
];

const FR_MONTHS: [&str; 12] = [
  "janvier",
  "février",
  "mars",
  "avril",
  "mai",
  "juin",
  "juillet",
  "août",
  "septembre",
  "octobre",
  "novembre",
  "décembre"
];

const EN_WEEKDAYS: [&str; 7] = [
  "Monday",
  "Tuesday",
  "Wednesday",
  "Thursday",
  "Friday",
  "Saturday",
  "Sunday"
];

const DE_WEEKDAYS: [&str; 7] = [
  "Montag",
  "Dienstag",
  "Mittwoch",
  "Donnerstag",
  "Freitag",
  "Samstag",
  "Sonntag"
];

const ES_WEEKDAYS: [&str; 7] = [
  "lunes",
  "martes",
  "miércoles",
  "jueves",
  "viernes",
  "sábado",
  "domingo"
];

const FR_WEEKDAYS: [&str; 7] = [
  "lundi",
  "mardi",
  "mercredi",
  "jeudi",
  "vendredi",
  "samedi",
  "dimanche"
];

const ENGLISH: Translations =
  Translations {
    view: Cow::Borrowed("View"),
    period: Cow::Borrowed("Period"),
    calendar: Cow::Borrowed("Calendar"),
    timeline: Cow::Borrowed("Timeline"),
    day: Cow::Borrowed("Day"),
    week: Cow::Borrowed("Week"),
    month: Cow::Borrowed("Month"),
    year: Cow::Borrowed("Year"),
    today: Cow::Borrowed("Today"),
    new_item: Cow::Borrowed("New Item"),
    add: Cow::Borrowed("Add"),
    no_items_for_day: Cow::Borrowed(
      "No items for this day"
    ),
    no_items: Cow::Borrowed("No items"),
    timeline_mobile_message:
      Cow::Borrowed(
        "Timeline view is available on \
         larger screens"
      ),
    more_items: Cow::Borrowed("more"),
    all_day: Cow::Borrowed("All Day"),
    event: Cow::Borrowed("Event"),
    meeting: Cow::Borrowed("Meeting"),
    task: Cow::Borrowed("Task"),
    break_time: Cow::Borrowed("Break"),
    vacation: Cow::Borrowed("Vacation"),
    holiday: Cow::Borrowed("Holiday"),
    sick_leave: Cow::Borrowed(
      "Sick Leave"
    )
  };

const GERMAN: Translations =
  Translations {
    view: Cow::Borrowed("Ansicht"),
    period: Cow::Borrowed("Zeitraum"),
    calendar: Cow::Borrowed("Kalender"),
    timeline: Cow::Borrowed(
      "Zeitstrahl"
    ),
    day: Cow::Borrowed("Tag"),
    week: Cow::Borrowed("Woche"),
    month: Cow::Borrowed("Monat"),
    year: Cow::Borrowed("Jahr"),
    today: Cow::Borrowed("Heute"),
    new_item: Cow::Borrowed(
      "Neues Element"
    ),
    add: Cow::Borrowed("Hinzufügen"),
    no_items_for_day: Cow::Borrowed(
      "Keine Elemente für diesen Tag"
    ),
    no_items: Cow::Borrowed(
      "Keine Elemente"
    ),
    timeline_mobile_message:
      Cow::Borrowed(
        "Die Zeitleistenansicht ist auf \
         größeren Bildschirmen verfügbar"
      ),
    more_items: Cow::Borrowed("mehr"),
    all_day: Cow::Borrowed("Ganztägig"),
    event: Cow::Borrowed("Ereignis"),
    meeting: Cow::Borrowed(
      "Besprechung"
    ),
    task: Cow::Borrowed("Aufgabe"),
    break_time: Cow::Borrowed("Pause"),
    vacation: Cow::Borrowed("Urlaub"),
    holiday: Cow::Borrowed("Feiertag"),
    sick_leave: Cow::Borrowed(
      "Krankheit"
    )
  };

const SPANISH: Translations =
  Translations {
    view: Cow::Borrowed("Vista"),
    period: Cow::Borrowed("Período"),
    calendar: Cow::Borrowed(
      "Calendario"
    ),
    timeline: Cow::Borrowed(
      "Línea de tiempo"
    ),
    day: Cow::Borrowed("Día"),
    week: Cow::Borrowed("Semana"),
    month: Cow::Borrowed("Mes"),
    year: Cow::Borrowed("Año"),
    today: Cow::Borrowed("Hoy"),
    new_item: Cow::Borrowed(
      "Nuevo elemento"
    ),
    add: Cow::Borrowed("Agregar"),
    no_items_for_day: Cow::Borrowed(
      "No hay elementos para este día"
    ),
    no_items: Cow::Borrowed(
      "No hay elementos"
    ),
    timeline_mobile_message:
      Cow::Borrowed(
        "La vista de línea de tiempo está \
         disponible en pantallas más \
         grandes"
      ),
    more_items: Cow::Borrowed("más"),
    all_day: Cow::Borrowed(
      "Todo el día"
    ),
    event: Cow::Borrowed("Evento"),
    meeting: Cow::Borrowed("Reunión"),
    task: Cow::Borrowed("Tarea"),
    break_time: Cow::Borrowed(
      "Descanso"
    ),
    vacation: Cow::Borrowed(
      "Vacaciones"
    ),
    holiday: Cow::Borrowed("Festivo"),
    sick_leave: Cow::Borrowed(
      "Baja médica"
    )
  };

const FRENCH: Translations =
  Translations {
    view: Cow::Borrowed("Vue"),
    period: Cow::Borrowed("Période"),
    calendar: Cow::Borrowed(
      "Calendrier"
    ),
    timeline: Cow::Borrowed(
      "Chronologie"
    ),
    day: Cow::Borrowed("Jour"),
    week: Cow::Borrowed("Semaine"),
    month: Cow::Borrowed("Mois"),
    year: Cow::Borrowed("Année"),
    today: Cow::Borrowed(
      "Aujourd'hui"
    ),
    new_item: Cow::Borrowed(
      "Nouvel élément"
    ),
    add: Cow::Borrowed("Ajouter"),
    no_items_for_day: Cow::Borrowed(
      "Aucun élément pour ce jour"
    ),
    no_items: Cow::Borrowed(
      "Aucun élément"
    ),
    timeline_mobile_message:
      Cow::Borrowed(
        "La vue chronologique est \
         disponible sur les écrans plus \
         grands"
      ),
    more_items: Cow::Borrowed("plus"),
    all_day: Cow::Borrowed(
      "Toute la journée"
    ),
    event: Cow::Borrowed("Événement"),
    meeting: Cow::Borrowed("Réunion"),
    task: Cow::Borrowed("Tâche"),
    break_time: Cow::Borrowed("Pause"),
    vacation: Cow::Borrowed("Vacances"),
    holiday: Cow::Borrowed("Férié"),
    sick_leave: Cow::Borrowed("Maladie")
  };
