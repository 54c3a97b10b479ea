//! The ProofPass developer handbook as data.
//!
//! Content and diagrams are static tables; [`proofpass_handbook`] arranges
//! them into the block sequence the PDF renderer consumes.

use proofpass_core::draw::ShapeKind;

use crate::{
    diagram::{DiagramSpec, Direction, EdgeSpec, NodeSpec},
    document::{Block, Document},
};

/// Default file name of the generated handbook.
pub const OUTPUT_FILE: &str = "ProofPass_Developer_Handbook.pdf";

const TITLE: &str = "ProofPass Platform — Developer Handbook";

const SERVICE_FILL: &str = "#C8E6C9";
const CLIENT_FILL: &str = "#E3F2FD";
const ACTOR_FILL: &str = "#E1BEE7";
const LIBRARY_FILL: &str = "#FFF9C4";
const ZK_FILL: &str = "#FFE0B2";
const DATASTORE_FILL: &str = "#BBDEFB";

/// Services, libraries and datastores of the platform.
pub static ARCHITECTURE: DiagramSpec<'static> = DiagramSpec {
    name: "architecture_diagram",
    direction: Direction::TopToBottom,
    nodes: &[
        NodeSpec::new(
            "UI",
            "Clientes / Verificadores",
            ShapeKind::Box,
            CLIENT_FILL,
        ),
        NodeSpec::new(
            "API",
            "API Fastify\n(Auth, VC, ZKP, Passports)",
            ShapeKind::Box,
            SERVICE_FILL,
        ),
        NodeSpec::new("VC", "VC Toolkit", ShapeKind::Ellipse, LIBRARY_FILL),
        NodeSpec::new("ST", "Stellar SDK", ShapeKind::Ellipse, LIBRARY_FILL),
        NodeSpec::new("ZK", "ZK Toolkit", ShapeKind::Ellipse, ZK_FILL),
        NodeSpec::new("DB", "PostgreSQL", ShapeKind::Cylinder, DATASTORE_FILL),
        NodeSpec::new("R", "Redis", ShapeKind::Cylinder, DATASTORE_FILL),
    ],
    edges: &[
        EdgeSpec::new("UI", "API"),
        EdgeSpec::new("API", "VC"),
        EdgeSpec::new("API", "ST"),
        EdgeSpec::new("API", "ZK"),
        EdgeSpec::new("API", "DB"),
        EdgeSpec::new("API", "R"),
    ],
};

/// Issuance of one attestation, from request to returned QR code.
pub static SEQUENCE_FLOW: DiagramSpec<'static> = DiagramSpec {
    name: "sequence_flow",
    direction: Direction::LeftToRight,
    nodes: &[
        NodeSpec::new("U", "Usuario Emisor", ShapeKind::Ellipse, ACTOR_FILL),
        NodeSpec::new("API", "API Fastify", ShapeKind::Box, SERVICE_FILL),
        NodeSpec::new("VC", "VC Toolkit", ShapeKind::Ellipse, LIBRARY_FILL),
        NodeSpec::new("ST", "Stellar SDK", ShapeKind::Ellipse, LIBRARY_FILL),
        NodeSpec::new("DB", "PostgreSQL", ShapeKind::Cylinder, DATASTORE_FILL),
    ],
    edges: &[
        EdgeSpec::new("U", "API").with_label("POST /attestations"),
        EdgeSpec::new("API", "VC").with_label("Crea VC + firma"),
        EdgeSpec::new("API", "ST").with_label("Ancla hash VC"),
        EdgeSpec::new("ST", "API").with_label("txHash").dashed(),
        EdgeSpec::new("API", "DB").with_label("Guarda VC + QR"),
        EdgeSpec::new("API", "U").with_label("Retorna QR + VC").dashed(),
    ],
};

const INTRO: &str = "ProofPass Platform es una solución basada en Fastify y TypeScript que \
permite emitir, verificar y anclar credenciales verificables (VC) en la blockchain de Stellar, \
así como generar y validar pruebas de conocimiento cero (ZKP). Este documento describe su \
arquitectura, módulos principales, flujos de funcionamiento y recomendaciones de desarrollo.";

const MODULES: &str = "\
**Auth**: Gestiona usuarios, API keys y JWT.
**Attestations**: Crea, firma y ancla credenciales verificables en Stellar.
**Passports**: Agrupa atestaciones bajo un mismo producto.
**ZKP**: Genera y valida pruebas de conocimiento cero (threshold, range, set).
**VC Toolkit**: Implementa el estándar W3C Verifiable Credentials.
**Stellar SDK**: Maneja anclado de hashes y validación on-chain.
**ZK Toolkit**: Biblioteca para pruebas ZK simuladas.";

const SECURITY: &str = "\
- Autenticación con JWT y control de API keys.
- Rate limiting con Redis.
- Validación de entrada con Zod.
- CORS restringido y Helmet activado.
- Almacenamiento de secretos en entorno seguro.";

const ROADMAP: &str = "\
1. Integrar DIDs y LD-Proofs.
2. Reemplazar pruebas ZK simuladas por circuitos reales (Circom, Halo2).
3. Añadir auditoría y observabilidad (OpenTelemetry, Prometheus).
4. Migrar gestión de claves a Vault/KMS.";

/// Builds the handbook document.
pub fn proofpass_handbook() -> Document<'static> {
    let mut document = Document::new(TITLE);
    document
        .push(Block::Title(TITLE))
        .push(Block::Paragraph("Xcapit Blockchain & AI Lab — Noviembre 2025"))
        .push(Block::Spacer(20.0))
        .push(Block::Paragraph(INTRO))
        .push(Block::PageBreak)
        .push(Block::Heading("Arquitectura general del sistema"))
        .push(Block::Diagram {
            spec: &ARCHITECTURE,
            width_cm: 15.0,
            height_cm: 10.0,
        })
        .push(Block::PageBreak)
        .push(Block::Heading("Módulos principales"))
        .push(Block::Paragraph(MODULES))
        .push(Block::PageBreak)
        .push(Block::Heading("Flujo de emisión de atestación"))
        .push(Block::Diagram {
            spec: &SEQUENCE_FLOW,
            width_cm: 15.0,
            height_cm: 9.0,
        })
        .push(Block::PageBreak)
        .push(Block::Heading("Seguridad y buenas prácticas"))
        .push(Block::Paragraph(SECURITY))
        .push(Block::Spacer(10.0))
        .push(Block::Heading("Roadmap técnico"))
        .push(Block::Paragraph(ROADMAP));
    document
}
