//! Classification prompt
//!
//! One fixed template in the deployment language. The model is told to
//! answer with nothing but an intent name.

/// Build the classification instruction for `query` over `intents`
pub fn classification_prompt(query: &str, intents: &[String]) -> String {
    format!(
        "Из списка интентов: [{}] выбери наиболее близкий по смыслу к запросу: \"{}\". Ответь только названием интента.",
        intents.join(", "),
        query
    )
}
