//! Prompt Builder
//!
//! Maps each section to its analysis instruction and composes the final
//! prompt sent to the oracle. Templates are plain data; the Octane template
//! is rendered with the detected GPU roster through `{{gpus}}` and
//! `{{reference}}` placeholders.

use std::collections::BTreeMap;

use bench_verdict_core::{GpuRoster, SectionId};

/// Instruction used for sections without a template.
pub const GENERIC_TEMPLATE: &str = "Analiza los resultados de este test.";

/// Relative tolerance, in percent, applied to the Octane reference scores.
pub const OCTANE_TOLERANCE_PERCENT: u32 = 5;

/// OctaneBench reference scores per GPU model.
pub const OCTANE_REFERENCE_SCORES: &[(&str, f64)] = &[
    ("RTX PRO 6000 Blackwell Workstation Edition", 1771.0),
    ("RTX 5090", 1743.0),
    ("RTX 5090 D", 1495.0),
    ("RTX 4090", 1304.5),
    ("RTX 6000 Ada Generation", 1196.0),
    ("NVIDIA RTX5880-Ada-48Q", 1194.0),
    ("RTX 4090 D", 1191.0),
    ("RTX 5080", 971.5),
    ("RTX 4080 Super", 948.0),
    ("L40S", 911.0),
    ("RTX 4080", 884.0),
    ("RTX 4070 Ti Super", 869.0),
    ("RTX 5070 Ti", 858.0),
    ("RTX 5090 Laptop GPU", 827.0),
    ("RTX 4090 Laptop GPU", 805.0),
    ("RTX 4070 Ti", 761.5),
    ("RTX 4070 Super", 702.0),
    ("RTX 5070", 696.0),
    ("RTX 5000 Ada Generation", 662.5),
    ("RTX 3090", 651.0),
    ("RTX A6000", 651.5),
    ("RTX 4070", 613.5),
    ("RTX 3090 Ti", 597.0),
    ("RTX A5000", 577.0),
];

const OCTANE_TEMPLATE: &str = "Se ha detectado la(s) GPU(s) en el sistema: {{gpus}}.\n\
Lee la sección de logs del test 'Octane' y extrae la puntuación exacta registrada \
(línea que contenga 'La puntuación de la tarjeta gráfica es:').\n\
Las puntuaciones de referencia aproximadas por GPU son:\n\
{{reference}}\
Busca la fila que corresponda a la(s) GPU(s) detectada(s); si no aparece en la lista, indícalo explícitamente. \
Si la puntuación coincide o está dentro de un {{tolerance}} % de la de referencia, indica “resultado correcto”; \
de lo contrario, indica “resultado no correcto” y sugiere verificar configuración o hardware.\n\
Incluye siempre al final este enlace para consultar más comparativas:\n\
https://render.otoy.com/octanebench/results.php?v=&sort_by=&scale_by=&filter=&singleGPU=1&showRTXOff=0";

/// Instruction templates per section. Octane is rendered separately.
const TEMPLATES: &[(SectionId, &str)] = &[
    (
        SectionId::Configuration,
        "Lee la sección de configuración. Ahí se listan los scripts que se van a ejecutar y sus parámetros \
(por ejemplo: num_cpus, mem_reservada_gb, frecuencia_base_mhz, duración, clock base de GPU, Dispositivo PCI). \
Extrae textualmente cada script con sus parámetros tal como aparecen, y preséntalo como un bloque ordenado, \
cada script en una línea independiente.",
    ),
    (
        SectionId::HardwareValues,
        "Lee la sección de configuración y valores iniciales. Extrae textualmente cada uno de los siguientes \
elementos tal como aparecen en el log, sin omitir ni añadir nada:\n\
- GPUs NVIDIA CUDA\n\
- CPUs disponibles\n\
- Modelo de CPU\n\
- BIOS (incluyendo nombre y versión)\n\
- Frecuencia actual de CPU\n\
- Frecuencia base (mínima)\n\
- Frecuencia boost (máxima)\n\
- Núcleos físicos\n\
- Hilos por núcleo\n\
- Caché L1d, L1i, L2 y L3\n\
- Memoria RAM total\n\
Luego, extrae la sección de Información del BMC exactamente como aparece, incluyendo:\n\
- IP del BMC\n\
- MAC del BMC\n\
- Placa base\n\
Preséntalo como un bloque de datos ordenado, cada elemento en una línea independiente.",
    ),
    (
        SectionId::Governor,
        "Lee cuidadosamente la sección de logs correspondiente al test 'Gobernador'. \
Extrae exclusivamente las líneas donde se muestra el cambio de governor y las frecuencias de CPU antes y después. \
Incluye textualmente cualquier dato o mensaje que aparezca en los logs (por ejemplo, 'Cambiando el gobernador...' \
o 'Frecuencia actual: 1500.00 MHz'). No añadas explicaciones ni datos que no estén en los logs. \
Basándote únicamente en la información registrada, analiza si la configuración del modo 'performance' es \
adecuada para el rendimiento observado y explica brevemente por qué.",
    ),
    (
        SectionId::GeekbenchGpu,
        "Procesa los logs del test 'GeekbenchGPU' en GPU. Extrae textualmente cada uno de los siguientes \
elementos tal como aparecen en el log, sin añadir ni omitir nada y sin hacer interpretaciones ni análisis:\n\
  - La línea donde se detecta el número de GPUs (“Se han detectado (X) GPUs…”).\n\
  - Cada línea de inicio de prueba (“Ejecutando Geekbench en la GPU (Y)…”).\n\
  - Todas las URLs que aparezcan después de “Resultado:”.\n\n\
Preséntalo en el mismo orden en que aparecen en el log, preferiblemente como un bloque con cada elemento en \
línea independiente.",
    ),
    (
        SectionId::Bandwidth,
        "Analiza el bloque de logs del STREAM Benchmark (Anchobanda). Para cada uno de los valores Copy, Scale, \
Add y Triad, extrae textualmente las velocidades en MB/s. Evita cualquier cálculo o suposición adicional: usa \
únicamente los valores presentes. Resume en una frase si el rendimiento de memoria parece uniforme o si hay \
variaciones notables según los datos extraídos, determina si encuentras errores en los logs.",
    ),
    (
        SectionId::Mprime,
        "Lee los registros del test 'Mprime', centrándote en la evolución de la frecuencia de la CPU y las \
temperaturas. Extrae textualmente cualquier valor o mensaje que indique cambios de frecuencia, valores de \
temperatura o errores. No añadas estimaciones ni información externa. Concluye si hubo desviaciones respecto a \
la frecuencia base indicada y menciona cualquier alerta o comportamiento anómalo reflejado en los logs. Si la \
frecuencia observada cae por debajo de la frecuencia base configurada, considera esto como un fallo de hardware \
no válido para operar y sugiere verificar el equipo, esto se imparte también como Resultado OK o Resultado KO \
al final del log.",
    ),
    (
        SectionId::Geekbench,
        "Procesa los logs del test 'Geekbench' en CPU. Extrae los puntos clave textuales, como puntuaciones \
sintéticas o mensajes de resumen. Si no aparece ninguna puntuación, menciona las URLs registradas que hagan \
referencia a la prueba de CPU. No inventes valores: basa tu análisis únicamente en la información disponible \
y comenta la potencia y eficiencia percibida.",
    ),
    (
        SectionId::GpuBurn,
        "Lee la sección de logs del test 'GPU-BURN'. Extrae textualmente cualquier dato de estabilidad, mensajes \
de error o información de temperatura y rendimiento. No añadas métricas de rendimiento que no estén registradas. \
Analiza, basándote en los mensajes extraídos, la estabilidad térmica y de rendimiento de las GPUs durante la \
prueba. Si la velocidad de GPU medida está por debajo del clock base configurado, considera esto un problema \
crítico, indica que no es un funcionamiento válido y sugiere verificar el equipo.",
    ),
    (
        SectionId::Fio,
        "Analiza los logs del test 'FIO'. Extrae textualmente las velocidades de lectura y escritura que \
aparezcan (por ejemplo, 'read: 1.2 GB/s'). No hagas cálculos adicionales ni asumas valores que no estén \
presentes. Comenta si el rendimiento de almacenamiento parece acorde a las expectativas según las velocidades \
informadas.",
    ),
    (
        SectionId::Sectors,
        "Procesa los logs del test 'Sectores'. Extrae cualquier métrica de operación de disco registrada en los \
logs. No indagues en datos no presentes ni estimes valores. Menciona posibles anomalías o errores reflejados en \
los registros y resume la salud del disco según los datos exactos.",
    ),
    (
        SectionId::Result,
        "Lee la sección final 'Resultado'. Recopila textualmente cualquier resumen o valor global que indique el \
desempeño total de la máquina. No combines ni modifiques datos: integra lo extraído de cada sección previamente \
analizada y presenta un resumen global fiel a los logs.",
    ),
    (
        SectionId::Checks,
        "Analiza los logs del test 'Comprobaciones'. Extrae textualmente la verificación del dispositivo PCI y \
cualquier mensaje de estado relacionado con el hardware Intel. No añadas conclusiones que no estén respaldadas \
por los logs. Indica si el hardware opera correctamente según los mensajes de verificación encontrados.",
    ),
];

/// Data extracted from other sections that specializes a template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub gpus: GpuRoster,
}

/// Composes per-section prompts.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
    overrides: BTreeMap<SectionId, String>,
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Replace templates by section label; unknown labels are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (label, template) in overrides {
            match SectionId::from_label(label) {
                Some(id) => {
                    self.overrides.insert(id, template.clone());
                }
                None => tracing::warn!(label = %label, "ignoring prompt override for unknown section"),
            }
        }
        self
    }

    /// Instruction for a section, before the section text is attached.
    pub fn instruction(&self, section: SectionId, context: &PromptContext) -> String {
        let template = match self.overrides.get(&section) {
            Some(custom) => custom.as_str(),
            None if section == SectionId::Octane => OCTANE_TEMPLATE,
            None => builtin_template(section),
        };
        render(template, context)
    }

    /// Full prompt: instruction, the literal section text and the closing directive.
    pub fn build_prompt(&self, section: SectionId, text: &str, context: &PromptContext) -> String {
        format!(
            "{}\n\nSección '{}':\n\n{}\n\nProporciona un análisis detallado, razonado y bien estructurado en {}.",
            self.instruction(section, context),
            section.label(),
            text,
            self.language
        )
    }
}

/// Built-in template for a section, or the generic instruction.
pub fn builtin_template(section: SectionId) -> &'static str {
    TEMPLATES
        .iter()
        .find(|(id, _)| *id == section)
        .map(|(_, template)| *template)
        .unwrap_or(GENERIC_TEMPLATE)
}

fn render(template: &str, context: &PromptContext) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    let gpus = if context.gpus.is_empty() {
        "desconocida(s)".to_string()
    } else {
        context.gpus.names().join(", ")
    };
    template
        .replace("{{gpus}}", &gpus)
        .replace("{{reference}}", &reference_table())
        .replace("{{tolerance}}", &OCTANE_TOLERANCE_PERCENT.to_string())
}

fn reference_table() -> String {
    OCTANE_REFERENCE_SCORES
        .iter()
        .map(|(gpu, score)| format!("   • {}: {:.1}\n", gpu, score))
        .collect()
}
