//! Localization
//!
//! Number grouping rules and user-visible strings for each supported locale.

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::query::SortKey;
use std::str::FromStr;

/// Rendering locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
        }
    }

    fn separators(self) -> (char, char) {
        match self {
            Locale::PtBr => ('.', ','),
            Locale::EnUs => (',', '.'),
        }
    }

    /// Format `value` with thousands grouping, keeping between `min_frac`
    /// and `max_frac` fraction digits (trailing zeros past `min_frac` are
    /// dropped).
    pub fn format_number(self, value: f64, min_frac: usize, max_frac: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let (group_sep, decimal_sep) = self.separators();

        let fixed = format!("{:.*}", max_frac, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (fixed.clone(), String::new()),
        };

        let mut frac = frac_part;
        while frac.len() > min_frac && frac.ends_with('0') {
            frac.pop();
        }

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(ch);
        }

        let is_zero = int_part.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&grouped);
        if !frac.is_empty() {
            out.push(decimal_sep);
            out.push_str(&frac);
        }
        out
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::PtBr => &PT_BR,
            Locale::EnUs => &EN_US,
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            other => Err(format!("Unsupported locale: {}. Use pt-BR or en-US", other)),
        }
    }
}

/// User-visible strings
#[derive(Debug)]
pub struct Messages {
    pub currency_symbol: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub no_records: &'static str,
    /// Data column headers, in display order
    pub columns: [&'static str; 7],
    pub actions: &'static str,
    /// Caption template; `{from}`, `{to}` and `{total}` are substituted
    pub showing: &'static str,
    pub load_failed: &'static str,
    pub save_succeeded: &'static str,
    pub save_failed: &'static str,
    pub delete_succeeded: &'static str,
    pub delete_failed: &'static str,
    pub data_unavailable: &'static str,
    pub no_data: &'static str,
    pub title_costs: &'static str,
    pub title_consumption: &'static str,
    pub title_distance: &'static str,
    pub title_savings: &'static str,
    pub label_total_cost: &'static str,
    pub label_paid_cost: &'static str,
    pub label_percent_paid: &'static str,
    pub label_kwh_in_month: &'static str,
    pub label_kwh_per_100km: &'static str,
    pub label_km_in_month: &'static str,
    pub label_km: &'static str,
    pub label_total_savings: &'static str,
    pub label_paid_savings: &'static str,
    pub summary_total_cost: &'static str,
    pub summary_paid_cost: &'static str,
    pub summary_total_kwh: &'static str,
    pub summary_total_km: &'static str,
    pub summary_cost_per_kwh: &'static str,
    pub summary_cost_per_km: &'static str,
    pub summary_total_savings: &'static str,
    pub summary_paid_savings: &'static str,
    pub summary_savings_per_km: &'static str,
    /// `{value}` is substituted
    pub invalid_date: &'static str,
    /// `{field}` and `{value}` are substituted
    pub invalid_number: &'static str,
    pub page_title: &'static str,
    pub date_from: &'static str,
    pub date_to: &'static str,
    /// The "any" option of the exemption filter
    pub isento_all: &'static str,
    pub apply: &'static str,
    pub clear: &'static str,
    pub last_30_days: &'static str,
    pub export_csv: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
    pub save: &'static str,
    pub cancel: &'static str,
    pub close: &'static str,
    pub prev_page: &'static str,
    pub next_page: &'static str,
    pub edit_title: &'static str,
    pub delete_title: &'static str,
    pub delete_warning: &'static str,
    pub not_found: &'static str,
    pub back_to_dashboard: &'static str,
}

impl Messages {
    pub fn showing(&self, from: u64, to: u64, total: u64) -> String {
        self.showing
            .replace("{from}", &from.to_string())
            .replace("{to}", &to.to_string())
            .replace("{total}", &total.to_string())
    }

    /// User-facing text for an edit form field that does not parse
    pub fn form_error(&self, err: &FormError) -> String {
        match err {
            FormError::InvalidDate(value) => self.invalid_date.replace("{value}", value),
            FormError::InvalidNumber { field, value } => {
                let column = SortKey::ALL
                    .iter()
                    .position(|k| k.as_str() == *field)
                    .map_or(*field, |i| self.columns[i]);
                self.invalid_number
                    .replace("{field}", column)
                    .replace("{value}", value)
            }
        }
    }

    pub fn yes_no(&self, flag: bool) -> &'static str {
        if flag {
            self.yes
        } else {
            self.no
        }
    }
}

static PT_BR: Messages = Messages {
    currency_symbol: "R$",
    yes: "Sim",
    no: "Não",
    no_records: "Nenhuma recarga encontrada.",
    columns: ["Data", "kWh", "Custo", "Isento", "Odômetro", "Local", "Observações"],
    actions: "Ações",
    showing: "Exibindo {from}–{to} de {total}",
    load_failed: "Erro ao carregar recargas",
    save_succeeded: "Recarga atualizada com sucesso!",
    save_failed: "Erro ao salvar edição",
    delete_succeeded: "Recarga excluída com sucesso!",
    delete_failed: "Erro ao excluir recarga",
    data_unavailable: "Não foi possível carregar os dados.",
    no_data: "Sem dados para exibir.",
    title_costs: "Custos por mês",
    title_consumption: "Consumo por mês (kWh) e kWh/100 km",
    title_distance: "Km rodados por mês",
    title_savings: "Valores economizados por mês",
    label_total_cost: "Custo total (R$)",
    label_paid_cost: "Recargas pagas (R$)",
    label_percent_paid: "% pago sobre o total",
    label_kwh_in_month: "kWh no mês",
    label_kwh_per_100km: "kWh/100 km",
    label_km_in_month: "Km rodados no mês",
    label_km: "km",
    label_total_savings: "Economia total (R$)",
    label_paid_savings: "Economia em recargas pagas (R$)",
    summary_total_cost: "Custo total",
    summary_paid_cost: "Custo pago",
    summary_total_kwh: "Energia total (kWh)",
    summary_total_km: "Distância total (km)",
    summary_cost_per_kwh: "Custo médio por kWh",
    summary_cost_per_km: "Custo médio por km",
    summary_total_savings: "Economia total",
    summary_paid_savings: "Economia em recargas pagas",
    summary_savings_per_km: "Economia média por km",
    invalid_date: "Data inválida: {value}",
    invalid_number: "Valor inválido para {field}: {value}",
    page_title: "Recargas",
    date_from: "De",
    date_to: "Até",
    isento_all: "Todos",
    apply: "Aplicar",
    clear: "Limpar",
    last_30_days: "Últimos 30 dias",
    export_csv: "Exportar CSV",
    edit: "Editar",
    delete: "Excluir",
    save: "Salvar",
    cancel: "Cancelar",
    close: "Fechar",
    prev_page: "Anterior",
    next_page: "Próxima",
    edit_title: "Editar recarga",
    delete_title: "Excluir recarga?",
    delete_warning: "Esta ação não pode ser desfeita.",
    not_found: "Página não encontrada",
    back_to_dashboard: "Ir para o dashboard",
};

static EN_US: Messages = Messages {
    currency_symbol: "R$",
    yes: "Yes",
    no: "No",
    no_records: "No recharges found.",
    columns: ["Date", "kWh", "Cost", "Exempt", "Odometer", "Location", "Notes"],
    actions: "Actions",
    showing: "Showing {from}–{to} of {total}",
    load_failed: "Failed to load recharges",
    save_succeeded: "Recharge updated successfully!",
    save_failed: "Failed to save changes",
    delete_succeeded: "Recharge deleted successfully!",
    delete_failed: "Failed to delete recharge",
    data_unavailable: "Could not load the data.",
    no_data: "No data to display.",
    title_costs: "Costs per month",
    title_consumption: "Consumption per month (kWh) and kWh/100 km",
    title_distance: "Km driven per month",
    title_savings: "Savings per month",
    label_total_cost: "Total cost (R$)",
    label_paid_cost: "Paid recharges (R$)",
    label_percent_paid: "% paid of total",
    label_kwh_in_month: "kWh in month",
    label_kwh_per_100km: "kWh/100 km",
    label_km_in_month: "Km driven in month",
    label_km: "km",
    label_total_savings: "Total savings (R$)",
    label_paid_savings: "Savings on paid recharges (R$)",
    summary_total_cost: "Total cost",
    summary_paid_cost: "Paid cost",
    summary_total_kwh: "Total energy (kWh)",
    summary_total_km: "Total distance (km)",
    summary_cost_per_kwh: "Average cost per kWh",
    summary_cost_per_km: "Average cost per km",
    summary_total_savings: "Total savings",
    summary_paid_savings: "Savings on paid recharges",
    summary_savings_per_km: "Average savings per km",
    invalid_date: "Invalid date: {value}",
    invalid_number: "Invalid value for {field}: {value}",
    page_title: "Recharges",
    date_from: "From",
    date_to: "To",
    isento_all: "All",
    apply: "Apply",
    clear: "Clear",
    last_30_days: "Last 30 days",
    export_csv: "Export CSV",
    edit: "Edit",
    delete: "Delete",
    save: "Save",
    cancel: "Cancel",
    close: "Close",
    prev_page: "Previous",
    next_page: "Next",
    edit_title: "Edit recharge",
    delete_title: "Delete recharge?",
    delete_warning: "This cannot be undone.",
    not_found: "Page not found",
    back_to_dashboard: "Go to the dashboard",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_br_grouping() {
        assert_eq!(Locale::PtBr.format_number(1234.5, 2, 2), "1.234,50");
        assert_eq!(Locale::PtBr.format_number(1234567.891, 0, 2), "1.234.567,89");
        assert_eq!(Locale::PtBr.format_number(1234.0, 0, 2), "1.234");
        assert_eq!(Locale::PtBr.format_number(999.0, 2, 2), "999,00");
        assert_eq!(Locale::PtBr.format_number(0.0, 2, 2), "0,00");
    }

    #[test]
    fn test_en_us_grouping() {
        assert_eq!(Locale::EnUs.format_number(1234.5, 0, 2), "1,234.5");
        assert_eq!(Locale::EnUs.format_number(-98765.432, 2, 2), "-98,765.43");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(Locale::PtBr.format_number(-0.001, 2, 2), "0,00");
    }

    #[test]
    fn test_form_errors_are_localized() {
        let err = FormError::InvalidNumber {
            field: "odometro",
            value: "abc".to_string(),
        };
        assert_eq!(
            Locale::PtBr.messages().form_error(&err),
            "Valor inválido para Odômetro: abc"
        );
        assert_eq!(
            Locale::EnUs.messages().form_error(&err),
            "Invalid value for Odometer: abc"
        );

        let err = FormError::InvalidDate("14/05/2024".to_string());
        assert_eq!(Locale::EnUs.messages().form_error(&err), "Invalid date: 14/05/2024");
    }

    #[test]
    fn test_page_labels_follow_locale() {
        let pt = Locale::PtBr.messages();
        let en = Locale::EnUs.messages();
        assert_eq!((pt.page_title, en.page_title), ("Recargas", "Recharges"));
        assert_eq!((pt.save, en.save), ("Salvar", "Save"));
        assert_eq!(en.not_found, "Page not found");
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("en_us".parse::<Locale>().unwrap(), Locale::EnUs);
        assert!("fr-FR".parse::<Locale>().is_err());
    }

    #[test]
    fn test_caption_template() {
        let m = Locale::PtBr.messages();
        assert_eq!(m.showing(21, 40, 45), "Exibindo 21–40 de 45");
        assert_eq!(Locale::EnUs.messages().showing(41, 45, 45), "Showing 41–45 of 45");
    }
}
