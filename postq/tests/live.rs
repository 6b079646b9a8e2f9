//! Tests against a running Postgres server.
//!
//! Ignored by default; run with a reachable server and the usual `PG*`
//! variables or `DATABASE_URL` set:
//!
//! ```sh
//! cargo test --test live -- --ignored
//! ```
use postq::Connection;
use time::OffsetDateTime;

struct Rec {
    tf: bool,
    i32: i32,
    i64: i64,
    s: &'static str,
    b: &'static [u8],
}

const RECS: &[Rec] = &[
    Rec { tf: false, i32: i32::MIN, i64: i64::MIN, s: "hello world", b: &[0xDE, 0xAD] },
    Rec { tf: true, i32: i32::MAX, i64: i64::MAX, s: "Γεια σας κόσμο", b: &[0xBE, 0xEF] },
];

fn connect() -> Connection {
    Connection::connect_env().expect("connect")
}

#[test]
#[ignore = "needs a running Postgres server"]
fn boundary_values_round_trip() {
    let conn = connect();
    conn.exec(
        "CREATE TEMP TABLE postq_test (tf bool, i32 int, i64 bigint, s text, b bytea)",
        &[],
    )
    .unwrap();

    let stmt = conn.prepare("INSERT INTO postq_test VALUES ($1, $2, $3, $4, $5)").unwrap();
    for rec in RECS {
        let b = rec.b.to_vec();
        stmt.exec(&[&rec.tf, &rec.i32, &rec.i64, &rec.s, &b]).unwrap();
    }

    let mut res = conn.query("SELECT COUNT(*) FROM postq_test", &[]).unwrap();
    assert!(res.next());
    let mut count = 0i64;
    res.scan((&mut count,)).unwrap();
    assert_eq!(count as usize, RECS.len());
    res.clear();

    let mut res = conn.query("SELECT * FROM postq_test", &[]).unwrap();
    assert_eq!(res.columns().unwrap(), ["tf", "i32", "i64", "s", "b"]);
    let mut seen = 0;
    while res.next() {
        let rec = &RECS[seen];
        let mut tf = false;
        let mut i32v = 0i32;
        let mut i64v = 0i64;
        let mut s = String::new();
        let mut b = Vec::new();

        res.scan((&mut tf, &mut i32v, &mut i64v, &mut s, &mut b)).unwrap();
        assert_eq!(tf, rec.tf);
        assert_eq!(i32v, rec.i32);
        assert_eq!(i64v, rec.i64);
        assert_eq!(s, rec.s);
        assert_eq!(b, rec.b);
        seen += 1;
    }
    assert_eq!(seen, RECS.len());
    res.clear();
}

#[test]
#[ignore = "needs a running Postgres server"]
fn server_timestamp_scans() {
    let conn = connect();
    let mut res = conn.query("SELECT now()", &[]).unwrap();
    assert!(res.next());
    let mut now = OffsetDateTime::UNIX_EPOCH;
    res.scan((&mut now,)).unwrap();
    assert!(now > OffsetDateTime::UNIX_EPOCH);
}

#[test]
#[ignore = "needs a running Postgres server"]
fn float_extremes_round_trip() {
    let conn = connect();

    let mut res = conn.query("SELECT $1::float4", &[&f32::MAX]).unwrap();
    assert!(res.next());
    let mut f32v = 0f32;
    res.scan((&mut f32v,)).unwrap();
    assert_eq!(f32v, f32::MAX);
    res.clear();

    let mut res = conn.query("SELECT $1::float8", &[&f64::MAX]).unwrap();
    assert!(res.next());
    let mut f64v = 0f64;
    res.scan((&mut f64v,)).unwrap();
    assert_eq!(f64v, f64::MAX);
    res.clear();
}

#[test]
#[ignore = "needs a running Postgres server"]
fn null_cells_leave_destinations() {
    let conn = connect();
    let mut res = conn.query("SELECT NULL::int, 'x'::text", &[]).unwrap();
    assert!(res.next());
    let mut n = 1234i32;
    let mut s = String::new();
    res.scan((&mut n, &mut s)).unwrap();
    assert_eq!(n, 1234);
    assert_eq!(s, "x");
}

#[test]
#[ignore = "needs a running Postgres server"]
fn reset_reconnects() {
    let conn = connect();
    conn.reset().unwrap();
    conn.exec("SELECT 1", &[]).unwrap();
}
