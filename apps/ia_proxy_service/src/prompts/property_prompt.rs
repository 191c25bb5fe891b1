use ia_llm::ChatMessage;

use super::{lookup_phrase, or_not_specified};
use crate::property::property_request::PropertyBrief;

const STYLES: &[(&str, &str)] = &[
    (
        "professional",
        "profesional y objetivo, destacando datos concretos y ventajas reales",
    ),
    (
        "luxury",
        "elegante y exclusivo, transmitiendo sofisticación y calidad",
    ),
    (
        "friendly",
        "cercano y cálido, que invite a imaginar la vida en el inmueble",
    ),
    (
        "casual",
        "cercano y cálido, que invite a imaginar la vida en el inmueble",
    ),
    ("modern", "moderno y dinámico, con frases cortas y enérgicas"),
    (
        "family",
        "familiar y acogedor, centrado en la comodidad y la seguridad del hogar",
    ),
];

pub struct PropertyPrompt;

impl PropertyPrompt {
    pub fn get_system_prompt() -> &'static str {
        "Eres un redactor inmobiliario experto en anuncios para portales en español. \
         Escribes descripciones atractivas, honestas y bien estructuradas. \
         Responde únicamente con el texto de la descripción, sin títulos, \
         comillas ni comentarios adicionales."
    }

    pub fn style_phrase(style: Option<&str>) -> &'static str {
        lookup_phrase(STYLES, style)
    }

    pub fn get_prompt(brief: &PropertyBrief) -> String {
        format!(
            r#"Escribe una descripción para un anuncio inmobiliario con los siguientes datos:

- Tipo de propiedad: {}
- Ubicación: {}
- Habitaciones: {}
- Baños: {}
- Superficie (m²): {}
- Características destacadas: {}

El tono debe ser {}.
La descripción debe tener entre 120 y 200 palabras, en uno a tres párrafos, y terminar con una invitación a contactar o visitar la propiedad.
No inventes datos que no aparezcan arriba."#,
            brief.property_type,
            brief.location,
            or_not_specified(brief.rooms.as_deref()),
            or_not_specified(brief.bathrooms.as_deref()),
            or_not_specified(brief.size.as_deref()),
            or_not_specified(brief.features.as_deref()),
            Self::style_phrase(brief.style.as_deref()),
        )
    }

    pub fn messages(brief: &PropertyBrief) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(Self::get_system_prompt()),
            ChatMessage::user(Self::get_prompt(brief)),
        ]
    }
}
