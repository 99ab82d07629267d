use std::fs;

use clap::{Parser, Subcommand};

mod error;
mod ir;
mod parser;
mod span;

#[derive(Parser)]
#[command(name = "analizador")]
#[command(about = "Analizador léxico y sintáctico para un mini lenguaje imperativo", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compila el archivo: análisis léxico y sintáctico completo
    Compilar {
        /// Archivo fuente
        input: String,

        /// Mostrar el AST resultante
        #[arg(long)]
        show_ast: bool,
    },

    /// Muestra la secuencia de tokens sin compilar
    Tokens {
        /// Archivo fuente
        input: String,
    },

    /// Verifica si el programa podría ejecutarse (la ejecución no existe)
    Ejecutar {
        /// Archivo fuente
        input: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compilar { input, show_ast } => {
            let source = fs::read_to_string(&input)?;
            let outcome = parser::parse(&source);

            if outcome.success {
                println!("COMPILACION EXITOSA!!!");
                if show_ast {
                    if let Some(ast) = &outcome.ast {
                        println!("=== AST ===");
                        println!("{:#?}", ast);
                    }
                }
            } else {
                println!("Errores:");
                for (i, error) in outcome.errors.iter().enumerate() {
                    println!("  {}. {}", i + 1, error);
                }
            }
        }
        Commands::Tokens { input } => {
            let source = fs::read_to_string(&input)?;

            println!("=== FUENTE ===");
            println!("{}", source);
            println!("=== TOKENS ===");
            for token in parser::lexer::tokenize(&source) {
                println!(
                    "Tipo: {:?}, Valor: {}, Línea: {}, Columna: {}",
                    token.kind, token.text, token.span.line, token.span.column
                );
            }
        }
        Commands::Ejecutar { input } => {
            let source = fs::read_to_string(&input)?;
            let outcome = parser::parse(&source);

            if outcome.success {
                println!("Ejecutando... (aquí se implementaría la ejecución)");
            } else {
                eprintln!(
                    "No se puede ejecutar: {} error(es) de sintaxis",
                    outcome.errors.len()
                );
                for error in &outcome.errors {
                    eprintln!("  {}", error);
                }
            }
        }
    }

    Ok(())
}
