use postq::{Connection, Result};
use time::macros::datetime;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let conn = Connection::connect_env()?;
    println!("options: {:?}", conn.options()?);

    conn.exec(
        "CREATE TEMP TABLE demo (ok bool, n int, label text, payload bytea, at timestamptz)",
        &[],
    )?;

    let stmt = conn.prepare("INSERT INTO demo VALUES ($1, $2, $3, $4, $5)")?;
    let moment = datetime!(2023-05-01 10:00:00 +02:00);
    for n in 0..4i32 {
        let payload = vec![0xDE, 0xAD, n as u8];
        stmt.exec(&[&(n % 2 == 0), &n, &"demo row", &payload, &moment])?;
    }

    let mut rows = conn.query("SELECT * FROM demo ORDER BY n", &[])?;
    println!("columns: {:?}", rows.columns()?);

    let mut ok = false;
    let mut n = 0i32;
    let mut label = String::new();
    let mut payload = Vec::new();
    let mut at = time::OffsetDateTime::UNIX_EPOCH;

    while rows.next() {
        rows.scan((&mut ok, &mut n, &mut label, &mut payload, &mut at))?;
        println!("{n}: ok={ok} label={label} payload={payload:02x?} at={at}");
        println!("  raw: {:?}", rows.row_map()?);
    }
    rows.clear();

    conn.close();
    Ok(())
}
