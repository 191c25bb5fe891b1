use ia_llm::ChatMessage;

use super::{lookup_phrase, or_not_specified};
use crate::content::content_request::ContentBrief;

const TONES: &[(&str, &str)] = &[
    ("professional", "profesional y confiable"),
    ("friendly", "cercano y amigable"),
    ("casual", "cercano y amigable"),
    ("funny", "divertido y con humor ligero"),
    ("humorous", "divertido y con humor ligero"),
    ("inspirational", "inspirador y motivador"),
    ("educational", "educativo e informativo"),
];

const NETWORKS: &[(&str, &str)] = &[
    (
        "instagram",
        "Instagram: textos visuales y cercanos de 80 a 150 palabras, con emojis moderados y entre 5 y 10 hashtags",
    ),
    (
        "facebook",
        "Facebook: textos conversacionales de 60 a 120 palabras que inviten a comentar, con 2 a 4 hashtags",
    ),
    (
        "linkedin",
        "LinkedIn: textos profesionales de 100 a 200 palabras, con pocos emojis y 3 a 5 hashtags",
    ),
    (
        "twitter",
        "X (Twitter): mensajes directos de menos de 280 caracteres con 1 a 3 hashtags",
    ),
    (
        "x",
        "X (Twitter): mensajes directos de menos de 280 caracteres con 1 a 3 hashtags",
    ),
    (
        "tiktok",
        "TikTok: textos breves y enérgicos para acompañar un video, con 3 a 6 hashtags populares",
    ),
];

pub struct ContentPrompt;

impl ContentPrompt {
    pub fn get_system_prompt() -> &'static str {
        r##"Eres un experto en marketing de redes sociales para pequeños negocios hispanohablantes.
Responde ÚNICAMENTE con un array JSON válido, sin texto antes ni después, con este formato:
[{"content": "texto de la publicación", "hashtags": ["#ejemplo", "#otro"]}]"##
    }

    pub fn tone_phrase(tone: Option<&str>) -> &'static str {
        lookup_phrase(TONES, tone)
    }

    pub fn network_format(network: Option<&str>) -> &'static str {
        lookup_phrase(NETWORKS, network)
    }

    pub fn get_prompt(brief: &ContentBrief) -> String {
        format!(
            r#"Genera exactamente {} publicaciones para redes sociales.

Negocio: {}
Descripción del negocio: {}
Tono: {}
Formato: {}

Cada publicación debe ser distinta, aportar valor y terminar con una llamada a la acción.
Incluye los hashtags solo en el campo "hashtags", no dentro de "content"."#,
            brief.post_count,
            brief.business_type,
            or_not_specified(brief.business_desc.as_deref()),
            Self::tone_phrase(brief.tone.as_deref()),
            Self::network_format(brief.network.as_deref()),
        )
    }

    pub fn messages(brief: &ContentBrief) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(Self::get_system_prompt()),
            ChatMessage::user(Self::get_prompt(brief)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief(post_count: u32, tone: Option<&str>, network: Option<&str>) -> ContentBrief {
        ContentBrief {
            business_type: "Panadería".to_string(),
            business_desc: None,
            tone: tone.map(str::to_string),
            network: network.map(str::to_string),
            post_count,
        }
    }

    #[test]
    fn encodes_the_exact_post_count() {
        let prompt = ContentPrompt::get_prompt(&brief(7, None, None));

        assert!(prompt.starts_with("Genera exactamente 7 publicaciones"));
        assert!(prompt.contains("Negocio: Panadería"));
        assert!(prompt.contains("Descripción del negocio: no especificado"));
    }

    #[test]
    fn defaults_to_professional_tone_and_instagram_format() {
        let prompt = ContentPrompt::get_prompt(&brief(5, Some("sarcástico"), Some("myspace")));

        assert!(prompt.contains("Tono: profesional y confiable"));
        assert!(prompt.contains("Formato: Instagram:"));
        assert_eq!(prompt, ContentPrompt::get_prompt(&brief(5, None, None)));
    }

    #[test]
    fn known_networks_and_aliases_resolve() {
        assert!(ContentPrompt::network_format(Some("LinkedIn")).starts_with("LinkedIn"));
        assert_eq!(
            ContentPrompt::network_format(Some("x")),
            ContentPrompt::network_format(Some("twitter"))
        );
        assert_eq!(
            ContentPrompt::tone_phrase(Some("humorous")),
            ContentPrompt::tone_phrase(Some("funny"))
        );
    }

    #[test]
    fn system_prompt_demands_a_json_array() {
        let messages = ContentPrompt::messages(&brief(3, None, None));

        assert!(messages[0].content.contains("array JSON"));
        assert!(messages[1].content.contains("exactamente 3"));
    }
}
