use async_data::{all, AsyncData, AsyncDataError, Deferred, SourceConfig, SourceNode};

fn main() -> Result<(), AsyncDataError> {
    // Config y fuentes
    let config = SourceConfig::from_env()?;
    let profile_load = Deferred::<String, String>::new();
    let orders_load = Deferred::<String, String>::new();
    let (p, o) = (profile_load.clone(), orders_load.clone());
    let profile = SourceNode::with_config(move |user: &'static str| {
                                              println!("loading profile of {}", user);
                                              p.clone()
                                          },
                                          config);
    let orders = SourceNode::with_config(move |user: &'static str| {
                                             println!("loading orders of {}", user);
                                             o.clone()
                                         },
                                         config);

    // Vista derivada de la fuente de perfil
    let greeting = profile.requested(|| println!("profile requested"))
                          .map(|name| format!("hello, {}", name));
    greeting.map(|text| println!("{}", text));

    // Vista combinada: espera a las dos fuentes la primera vez
    let dashboard = all([&profile, &orders])?;
    dashboard.resolved_with(|values| println!("dashboard ready: {:?}", values),
                            |reason| println!("dashboard failed: {}", reason),
                            || println!("dashboard finished"));

    profile.load("ada")?;
    orders.load("ada")?;
    println!("loading? profile={} dashboard={}", profile.is_loading(), dashboard.is_loading());

    profile_load.resolve("Ada".into())?;
    orders_load.resolve("3 orders".into())?;
    println!("loading? profile={} dashboard={}", profile.is_loading(), dashboard.is_loading());

    // Un hijo creado tarde nace con el resultado ya transformado
    let shout = greeting.map(|text| text.to_uppercase());
    println!("late child value: {:?}", shout.value());
    Ok(())
}
