fn get_env_var(var_name: &str) -> String {
    std::env::var(var_name).unwrap_or_else(|_| panic!("{} must be set", var_name))
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub app_url: String,

    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_password: String,
    pub postgres_user: String,
    pub postgres_db: String,
    pub enable_auto_migrate: bool,

    pub redis_url: String,
    pub client_origin: String,

    // session stuff
    pub jwt_secret: String,
    pub jwt_max_age: i64,

    // email stuff
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub smtp_from: String,
}

impl Config {
    pub fn init() -> Config {
        let host = std::env::var("HOST").unwrap_or("0.0.0.0".to_string());
        let port = std::env::var("PORT").unwrap_or("3333".to_string());
        let app_url = std::env::var("APP_URL").unwrap_or(format!("http://localhost:{}", port));

        let postgres_host = get_env_var("POSTGRES_HOST");
        let postgres_port = get_env_var("POSTGRES_PORT").parse::<u16>().unwrap();
        let postgres_password = get_env_var("POSTGRES_PASSWORD");
        let postgres_user = get_env_var("POSTGRES_USER");
        let postgres_db = get_env_var("POSTGRES_DB");
        let enable_auto_migrate = std::env::var("ENABLE_AUTO_MIGRATE")
            .unwrap_or("true".to_string())
            .parse::<bool>()
            .unwrap();

        let redis_url = get_env_var("REDIS_URL");
        let client_origin = get_env_var("CLIENT_ORIGIN");

        let jwt_secret = get_env_var("JWT_SECRET");
        let jwt_max_age = get_env_var("JWT_MAXAGE");

        let smtp_host = std::env::var("SMTP_HOST").expect("SMTP_HOST must be set");
        let smtp_port = std::env::var("SMTP_PORT").expect("SMTP_PORT must be set");
        let smtp_user = std::env::var("SMTP_USER").expect("SMTP_USER must be set");
        let smtp_pass = std::env::var("SMTP_PASS").expect("SMTP_PASS must be set");
        let smtp_from = std::env::var("SMTP_FROM").expect("SMTP_FROM must be set");

        Config {
            host,
            port,
            app_url,

            postgres_host,
            postgres_port,
            postgres_password,
            postgres_user,
            postgres_db,
            enable_auto_migrate,

            redis_url,
            client_origin,

            jwt_secret,
            jwt_max_age: jwt_max_age.parse::<i64>().unwrap(),

            smtp_host,
            smtp_pass,
            smtp_user,
            smtp_port: smtp_port.parse::<u16>().unwrap(),
            smtp_from,
        }
    }
}
