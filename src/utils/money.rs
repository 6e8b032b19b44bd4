// Utilitários para manipulação de valores monetários

/// Formata um valor em reais com duas casas decimais, ex.: `R$100.00`.
pub fn format_brl(amount: f64) -> String {
    format!("R${:.2}", amount)
}
