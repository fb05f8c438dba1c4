// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANG: &str = "pt";

// Mensagens por código. `{nome}` é substituído pelos argumentos de `format`.
const PT: &[(&str, &str)] = &[
    ("validation_error", "Um ou mais campos são inválidos."),
    ("email_already_exists", "Este e-mail já está em uso."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("user_not_found", "Usuário não encontrado."),
    ("resource_not_found", "Registro não encontrado: {resource}."),
    ("invalid_sort_key", "Campo de ordenação inválido: {field}."),
    ("unknown_field", "Campo desconhecido: {field}."),
    ("invalid_month", "Mês inválido (use AAAA-MM): {value}."),
    ("invalid_period", "Período inválido: informe início e fim, com início antes do fim."),
    ("plan_upgrade_required", "Recurso disponível apenas no plano Premium. Faça upgrade do seu plano."),
    ("admin_required", "Acesso restrito a administradores."),
    ("monthly_quota_reached", "Limite de {limit} agendamentos por mês atingido! Faça upgrade do seu plano."),
    ("invalid_status_transition", "Não é possível alterar o status de {from} para {to}."),
    ("plan_already_active", "Você já está no plano {plan}."),
    ("payment_redirect_not_trusted", "A confirmação de pagamento por redirecionamento está desativada."),
    ("payment_gateway_not_configured", "Pagamento indisponível. Verifique a configuração do backend (token de acesso do Mercado Pago)."),
    ("payment_gateway_error", "Erro ao criar o pagamento. Verifique a configuração do backend."),
    ("internal_error", "Ocorreu um erro inesperado."),
    // Detalhes de validação por campo
    ("required", "Campo obrigatório."),
    ("select_client", "Selecione o cliente."),
    ("select_service", "Selecione o serviço."),
    ("invalid_email", "O e-mail fornecido é inválido."),
    ("password_too_short", "A senha deve ter no mínimo 6 caracteres."),
    ("non_negative", "O valor não pode ser negativo."),
    ("invalid_time", "Horário inválido (use HH:MM)."),
    ("category_mismatch", "Categoria incompatível com o tipo do lançamento."),
    ("client_not_found", "Cliente não encontrado."),
    ("service_unavailable", "Serviço inexistente ou inativo."),
];

const EN: &[(&str, &str)] = &[
    ("validation_error", "One or more fields are invalid."),
    ("email_already_exists", "This e-mail is already in use."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("user_not_found", "User not found."),
    ("resource_not_found", "Record not found: {resource}."),
    ("invalid_sort_key", "Invalid sort field: {field}."),
    ("unknown_field", "Unknown field: {field}."),
    ("invalid_month", "Invalid month (use YYYY-MM): {value}."),
    ("invalid_period", "Invalid period: provide start and end, with start before end."),
    ("plan_upgrade_required", "This feature is only available on the Premium plan. Please upgrade."),
    ("admin_required", "Administrators only."),
    ("monthly_quota_reached", "Monthly limit of {limit} appointments reached! Please upgrade your plan."),
    ("invalid_status_transition", "Cannot change status from {from} to {to}."),
    ("plan_already_active", "You are already on the {plan} plan."),
    ("payment_redirect_not_trusted", "Payment confirmation by redirect is disabled."),
    ("payment_gateway_not_configured", "Payments unavailable. Check the backend configuration (Mercado Pago access token)."),
    ("payment_gateway_error", "Could not create the payment. Check the backend configuration."),
    ("internal_error", "An unexpected error occurred."),
    ("required", "This field is required."),
    ("select_client", "Select a client."),
    ("select_service", "Select a service."),
    ("invalid_email", "The e-mail provided is invalid."),
    ("password_too_short", "Password must be at least 6 characters long."),
    ("non_negative", "The value cannot be negative."),
    ("invalid_time", "Invalid time (use HH:MM)."),
    ("category_mismatch", "Category does not match the transaction type."),
    ("client_not_found", "Client not found."),
    ("service_unavailable", "Service does not exist or is inactive."),
];

#[derive(Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let catalogs = [("pt", PT), ("en", EN)]
            .into_iter()
            .map(|(lang, entries)| (lang, entries.iter().copied().collect()))
            .collect();
        Self { catalogs: Arc::new(catalogs) }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    /// Idioma pedido, depois português, depois a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        [lang, DEFAULT_LANG]
            .iter()
            .find_map(|l| self.catalogs.get(l).and_then(|c| c.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn format(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        args.iter().fold(self.translate(lang, key), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese_then_key() {
        let i18n = I18nStore::new();
        assert_eq!(i18n.translate("en", "required"), "This field is required.");
        assert_eq!(i18n.translate("es", "required"), "Campo obrigatório.");
        assert_eq!(i18n.translate("pt", "no_such_key"), "no_such_key");
    }

    #[test]
    fn substitutes_arguments() {
        let i18n = I18nStore::new();
        let msg = i18n.format("pt", "monthly_quota_reached", &[("limit", "10".into())]);
        assert!(msg.starts_with("Limite de 10 agendamentos"));
    }

    #[test]
    fn both_catalogs_have_the_same_keys() {
        let pt: Vec<_> = PT.iter().map(|(k, _)| *k).collect();
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(pt, en);
    }
}
