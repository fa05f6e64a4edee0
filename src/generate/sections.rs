//! The standard proposal sections and their placeholder table.
use super::cleanup::strip_markdown;
use super::prompt::ProposalInfo;
use super::{ChatMessage, TextGenerator};
use crate::error::Result;
use crate::template::{PlaceholderTable, SectionSource};
use std::sync::Arc;

const RESUMEN: &str = "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE un \
resumen ejecutivo profesional para documentos Word.\n\nIMPORTANTE:\n\
- NO uses formato Markdown (sin #, **, -, etc.)\n\
- Escribe en párrafos corridos para Word\n\
- Estilo profesional y ejecutivo\n\
- Máximo 4 párrafos\n\
- No incluyas títulos ni encabezados\n\
- Enfócate solo en el resumen ejecutivo del proyecto";

const ALCANCE: &str = "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE el \
alcance mínimo del proyecto para documentos Word.\n\nIMPORTANTE:\n\
- NO uses formato Markdown (sin #, **, -, etc.)\n\
- Escribe en párrafos corridos para Word\n\
- Describe qué incluye el proyecto específicamente\n\
- Máximo 5 párrafos\n\
- No incluyas títulos ni encabezados\n\
- Enfócate solo en el alcance del proyecto";

const PLAN_TRABAJO: &str = "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE \
el plan de trabajo del proyecto para documentos Word.\n\nIMPORTANTE:\n\
- Si hay información tabular, preséntala usando bullets (•) en formato estructurado\n\
- Conserva TODOS los números, fechas, porcentajes y datos cuantitativos\n\
- Si hay fases con duraciones, inclúyelas con sus tiempos específicos\n\
- Usa formato: \"• Fase X: Descripción - Duración: X semanas - Porcentaje: X%\"\n\
- NO uses formato Markdown tabla (|---|)\n\
- Escribe en párrafos y listas con bullets para Word\n\
- Máximo 6 párrafos o secciones con bullets\n\
- Incluye TODA la información numérica disponible";

const EQUIPO: &str = "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE la \
descripción del equipo de trabajo para documentos Word.\n\nIMPORTANTE:\n\
- Si hay información de roles con costos, preséntala usando bullets (•)\n\
- Conserva TODOS los números, tarifas, horas y subtotales\n\
- Usa formato: \"• Rol: Descripción - Dedicación: X% - Horas: X - Tarifa: $X - Subtotal: $X\"\n\
- NO uses formato Markdown tabla (|---|)\n\
- Incluye descuentos y totales si están disponibles\n\
- Escribe en párrafos y listas con bullets para Word\n\
- Máximo 5 párrafos o secciones con bullets\n\
- Incluye TODA la información numérica y financiera disponible";

const INVERSION: &str = "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE la \
explicación de la inversión detallada para documentos Word.\n\nIMPORTANTE:\n\
- Conserva TODOS los números, montos, porcentajes y cifras exactas\n\
- Si hay desglose de costos, preséntalo usando bullets (•)\n\
- Usa formato: \"• Concepto: Descripción - Monto: $X,XXX MXN\"\n\
- NO uses formato Markdown tabla (|---|)\n\
- Incluye servicios profesionales, costos de setup, costos operativos\n\
- Menciona la inversión total inicial con el monto exacto\n\
- Escribe en párrafos y listas con bullets para Word\n\
- Máximo 4 párrafos o secciones con bullets\n\
- Incluye TODA la información financiera disponible";

const SUPUESTOS: &str = "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE los \
supuestos y condiciones del proyecto para documentos Word.\n\nIMPORTANTE:\n\
- NO uses formato Markdown (sin #, **, -, etc.)\n\
- Escribe en párrafos corridos para Word\n\
- Describe supuestos técnicos y condiciones comerciales\n\
- Máximo 4 párrafos\n\
- No incluyas títulos ni encabezados\n\
- Enfócate en aspectos clave del proyecto";

/// One model-generated section: fixed system instruction, prompt as the user
/// message, cleaned of Markdown on the way out.
pub struct ChatSection {
    generator: Arc<dyn TextGenerator>,
    instruction: &'static str,
    request: &'static str,
    max_tokens: u32,
}

impl ChatSection {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        instruction: &'static str,
        request: &'static str,
        max_tokens: u32,
    ) -> Self {
        Self {
            generator,
            instruction,
            request,
            max_tokens,
        }
    }
}

impl SectionSource for ChatSection {
    fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let messages = [
            ChatMessage::system(self.instruction),
            ChatMessage::user(format!("{}:\n\n{prompt}", self.request)),
        ];
        let content = self.generator.complete(&messages, self.max_tokens)?;
        Ok(content.map(|text| strip_markdown(&text)))
    }
}

/// The cover letter: model-written core wrapped in a fixed salutation frame
/// carrying the extracted company, date and title.
pub struct CoverLetterSection {
    generator: Arc<dyn TextGenerator>,
    max_tokens: u32,
}

impl CoverLetterSection {
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: u32) -> Self {
        Self {
            generator,
            max_tokens,
        }
    }
}

impl SectionSource for CoverLetterSection {
    fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let info = ProposalInfo::extract(prompt);

        let instruction = format!(
            "Eres un consultor experto en propuestas técnicas. Genera ÚNICAMENTE una carta de \
presentación profesional para documentos Word.\n\nIMPORTANTE:\n\
- NO uses formato Markdown (sin #, **, -, etc.)\n\
- Escribe en párrafos corridos para Word\n\
- Usa un tono profesional y cordial\n\
- Menciona específicamente el proyecto y sus características principales\n\
- Incluye los datos extraídos: Empresa: {}, Fecha: {}\n\
- Máximo 3 párrafos\n\
- No incluyas títulos ni encabezados\n\
- Enfócate en el valor que HITSS puede aportar al proyecto",
            info.company, info.date
        );
        let messages = [
            ChatMessage::system(instruction),
            ChatMessage::user(format!(
                "Genera una carta de presentación profesional para la empresa {} basándote en \
este proyecto:\n\n{prompt}",
                info.company
            )),
        ];

        let Some(content) = self.generator.complete(&messages, self.max_tokens)? else {
            return Ok(None);
        };

        let letter = format!(
            "Estimado Equipo,\n\nCiudad de México, México {}\n\nEn representación de HITSS, \
agradecemos profundamente la oportunidad que nos brindan de presentar nuestra propuesta para \
{}. {content}\n\nAtentamente,\nSergio Portales Aburto",
            info.date,
            info.title.to_lowercase()
        );
        Ok(Some(strip_markdown(&letter)))
    }
}

/// Build the standard placeholder table of a proposal template.
///
/// Order matters: the resolver walks entries in insertion order, so the body
/// sections come first and the cover-page title and date last. The title and
/// date entries are resolved locally from the prompt without a model call.
pub fn standard_table(generator: Arc<dyn TextGenerator>) -> PlaceholderTable {
    PlaceholderTable::new()
        .with(
            "[RESUMEN]",
            ChatSection::new(
                Arc::clone(&generator),
                RESUMEN,
                "Basándote en esta información, genera únicamente el resumen ejecutivo profesional",
                600,
            ),
        )
        .with(
            "[ALCANCE]",
            ChatSection::new(
                Arc::clone(&generator),
                ALCANCE,
                "Basándote en esta información, genera únicamente el alcance mínimo del proyecto",
                700,
            ),
        )
        .with(
            "[PLAN_TRABAJO]",
            ChatSection::new(
                Arc::clone(&generator),
                PLAN_TRABAJO,
                "Basándote en esta información, genera la descripción del plan de trabajo \
incluyendo TODAS las fases, duraciones y porcentajes mostrados",
                800,
            ),
        )
        .with(
            "[EQUIPO]",
            ChatSection::new(
                Arc::clone(&generator),
                EQUIPO,
                "Basándote en esta información, genera la descripción del equipo incluyendo \
TODOS los roles, costos, tarifas y totales mostrados",
                800,
            ),
        )
        .with(
            "[INVERSION]",
            ChatSection::new(
                Arc::clone(&generator),
                INVERSION,
                "Basándote en esta información, genera la explicación de la inversión \
incluyendo TODOS los montos, costos y totales mostrados",
                700,
            ),
        )
        .with(
            "[SUPUESTOS]",
            ChatSection::new(
                Arc::clone(&generator),
                SUPUESTOS,
                "Basándote en esta información, genera únicamente los supuestos y condiciones",
                700,
            ),
        )
        .with(
            "[CARTA_PRESENTACION]",
            CoverLetterSection::new(Arc::clone(&generator), 500),
        )
        .with("[titulo]", |prompt: &str| -> Result<Option<String>> {
            Ok(Some(ProposalInfo::extract(prompt).title))
        })
        .with("[fecha]", |prompt: &str| -> Result<Option<String>> {
            Ok(Some(ProposalInfo::extract(prompt).date))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and answers with a canned string.
    struct Canned {
        answer: Option<String>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl Canned {
        fn new(answer: Option<&str>) -> Self {
            Self {
                answer: answer.map(str::to_string),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Canned {
        fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Option<String>> {
            let user = messages
                .iter()
                .find(|m| m.role == "user")
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.calls.lock().unwrap().push((user, max_tokens));
            Ok(self.answer.clone())
        }
    }

    #[test]
    fn test_standard_table_order() {
        let generator = Arc::new(Canned::new(Some("x")));
        let table = standard_table(generator);

        let tokens: Vec<&str> = table.iter().map(|(token, _)| token).collect();
        assert_eq!(
            tokens,
            [
                "[RESUMEN]",
                "[ALCANCE]",
                "[PLAN_TRABAJO]",
                "[EQUIPO]",
                "[INVERSION]",
                "[SUPUESTOS]",
                "[CARTA_PRESENTACION]",
                "[titulo]",
                "[fecha]",
            ]
        );
    }

    #[test]
    fn test_chat_section_strips_markdown_and_passes_budget() {
        let generator = Arc::new(Canned::new(Some("## Título\n**negrita**")));
        let section = ChatSection::new(Arc::clone(&generator) as _, RESUMEN, "Genera", 600);

        let out = section.generate("proyecto X").unwrap();

        assert_eq!(out.as_deref(), Some("Título\nnegrita"));
        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("proyecto X"));
        assert_eq!(calls[0].1, 600);
    }

    #[test]
    fn test_cover_letter_frames_model_output() {
        let generator = Arc::new(Canned::new(Some("Nos entusiasma el proyecto.")));
        let section = CoverLetterSection::new(generator, 500);

        let out = section
            .generate("# Plan Maestro\npropuesta para Acme Corp, 1/2/2026")
            .unwrap()
            .unwrap();

        assert!(out.starts_with("Estimado Equipo,"));
        assert!(out.contains("Ciudad de México, México 1/2/2026"));
        assert!(out.contains("propuesta para plan maestro. Nos entusiasma el proyecto."));
        assert!(out.ends_with("Atentamente,\nSergio Portales Aburto"));
    }

    #[test]
    fn test_cover_letter_empty_model_output_skips() {
        let generator = Arc::new(Canned::new(None));
        let section = CoverLetterSection::new(generator, 500);

        assert_eq!(section.generate("lo que sea").unwrap(), None);
    }

    #[test]
    fn test_title_and_date_resolved_locally() {
        let generator = Arc::new(Canned::new(Some("nunca usado")));
        let table = standard_table(Arc::clone(&generator) as _);

        let prompt = "# Plan Piloto\nfecha 9/9/2026";
        for (token, source) in table.iter() {
            match token {
                "[titulo]" => {
                    assert_eq!(source.generate(prompt).unwrap().as_deref(), Some("Plan Piloto"));
                },
                "[fecha]" => {
                    assert_eq!(source.generate(prompt).unwrap().as_deref(), Some("9/9/2026"));
                },
                _ => {},
            }
        }
        // No model call was made for either local entry.
        assert!(generator.calls.lock().unwrap().is_empty());
    }
}
