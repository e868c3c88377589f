use async_data::{all, AsyncData, CombinedNode, Deferred, LocalTask, Node, SourceConfig, SourceNode};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::Notify;

/// Cargas pendientes, cada una con el usuario que la pidió.
type Pending = Rc<RefCell<VecDeque<(String, Deferred<Value, String>)>>>;
type Source = SourceNode<String, Deferred<Value, String>>;

/// Pequeño menú interactivo para ver la propagación de eventos entre una
/// fuente de perfil, una fuente de pedidos y su combinación.
///
/// Cada carga queda pendiente hasta que se resuelve o rechaza a mano desde
/// el menú. La opción 7 hace una carga real con tokio y un retraso
/// configurable (`ASYNC_DATA_DEMO_DELAY_MS`).
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env().init();
    let config = SourceConfig::from_env()?;
    log::info!("load policy: {:?}", config.load_policy);

    let (profile, profile_pending) = pending_source("perfil", config);
    let (orders, orders_pending) = pending_source("pedidos", config);

    let profile_name = profile.requested(|| println!("  [perfil] carga solicitada"))
                              .map(|v: Value| v["name"].as_str().unwrap_or("<sin nombre>").to_string());
    profile_name.resolved_with(|name| println!("  [perfil] nombre: {}", name),
                               |reason| println!("  [perfil] error: {}", reason),
                               || println!("  [perfil] terminado"));

    let dashboard = all([&profile, &orders])?;
    dashboard.requested(|| println!("  [dashboard] actualizando..."))
             .resolved_with(|values| println!("  [dashboard] listo: {}", Value::Array(values)),
                            |reason| println!("  [dashboard] fallo: {}", reason),
                            || println!("  [dashboard] terminado"));

    loop {
        print_menu();
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                let user = prompt("Usuario: ")?;
                if let Err(e) = profile.load(user.trim().to_string()) {
                    eprintln!("Error cargando perfil: {}", e);
                }
            }
            "2" => {
                let user = prompt("Usuario: ")?;
                if let Err(e) = orders.load(user.trim().to_string()) {
                    eprintln!("Error cargando pedidos: {}", e);
                }
            }
            "3" => settle(&profile_pending, true)?,
            "4" => settle(&profile_pending, false)?,
            "5" => settle(&orders_pending, true)?,
            "6" => print_status(&profile, &orders, &profile_name, &dashboard),
            "7" => {
                if let Err(e) = delayed_load() {
                    eprintln!("Error en la carga con tokio: {}", e);
                }
            }
            "8" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn print_menu() {
    println!("\n== AsyncData CLI menu ==");
    println!("1) Cargar perfil");
    println!("2) Cargar pedidos");
    println!("3) Resolver la carga de perfil más antigua");
    println!("4) Rechazar la carga de perfil más antigua");
    println!("5) Resolver la carga de pedidos más antigua");
    println!("6) Ver estado");
    println!("7) Carga con retraso usando tokio");
    println!("8) Salir");
}

/// Fuente cuyas cargas quedan en una cola de `Deferred` pendientes.
fn pending_source(label: &'static str, config: SourceConfig) -> (Source, Pending) {
    let pending: Pending = Rc::new(RefCell::new(VecDeque::new()));
    let queue = Rc::clone(&pending);
    let source = SourceNode::with_config(move |user: String| {
                                             log::debug!("{}: nueva carga para {}", label, user);
                                             let d = Deferred::new();
                                             queue.borrow_mut().push_back((user, d.clone()));
                                             d
                                         },
                                         config);
    (source, pending)
}

fn settle(pending: &Pending, fulfil: bool) -> Result<(), Box<dyn Error>> {
    let next = pending.borrow_mut().pop_front();
    let Some((user, deferred)) = next else {
        println!("No hay cargas pendientes");
        return Ok(());
    };
    if fulfil {
        let payload = prompt("Valor (JSON o texto simple): ")?;
        let mut value: Value = serde_json::from_str(&payload).unwrap_or(json!(payload.trim()));
        // sin nombre explícito se usa el usuario de esta carga
        if let Value::Object(ref mut map) = value {
            map.entry("name").or_insert(json!(user));
        }
        deferred.resolve(value)?;
    } else {
        let reason = prompt("Motivo: ")?;
        deferred.reject(reason.trim().to_string())?;
    }
    Ok(())
}

fn print_status(profile: &Source, orders: &Source, profile_name: &Node<String, String>, dashboard: &CombinedNode<Value, String>) {
    println!("\n{}", chrono::Local::now().format("%H:%M:%S"));
    println!("perfil    | cargando: {:5} | valor: {:?} | error: {:?}",
             profile.is_loading(),
             profile.node().value(),
             profile.node().error());
    println!("pedidos   | cargando: {:5} | valor: {:?} | error: {:?}",
             orders.is_loading(),
             orders.node().value(),
             orders.node().error());
    println!("nombre    | cargando: {:5} | valor: {:?}", profile_name.is_loading(), profile_name.value());
    println!("dashboard | cargando: {:5} | valor: {:?}", dashboard.is_loading(), dashboard.node().value());
}

/// Carga real con tokio: un `LocalTask` que espera `ASYNC_DATA_DEMO_DELAY_MS`.
fn delayed_load() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let delay_ms: u64 = match std::env::var("ASYNC_DATA_DEMO_DELAY_MS") {
        Ok(raw) => raw.trim().parse()?,
        Err(_) => 300,
    };

    let rt = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let local = Rc::new(tokio::task::LocalSet::new());
    let set = Rc::clone(&local);
    local.block_on(&rt, async move {
             let data = SourceNode::new(move |label: &'static str| {
                 LocalTask::new(&set, async move {
                     tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                     Ok::<Value, String>(json!({ "label": label, "delay_ms": delay_ms }))
                 })
             });
             data.requested(|| println!("  [tokio] carga iniciada"))
                 .resolved_with(|v| println!("  [tokio] resultado: {}", v),
                                |e| println!("  [tokio] error: {}", e),
                                || println!("  [tokio] terminado"));

             let done = Rc::new(Notify::new());
             let signal = Rc::clone(&done);
             data.node().finished().subscribe(move |_| signal.notify_one());

             data.load("demo")?;
             done.notified().await;
             Ok::<(), Box<dyn Error>>(())
         })
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
