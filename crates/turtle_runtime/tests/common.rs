use std::path::Path;

use turtle_runtime::RunError;

#[derive(Default, Clone)]
pub struct TestCase {
    input: String,
    expected: String,
}

fn draw_one(s: &str) -> Result<Vec<(i64, i64)>, RunError> {
    let prog = turtlelang::program(dbg!(s))?;
    Ok(turtle_runtime::draw(&prog, Vec::new())?)
}

fn parse_pixels(s: &str) -> Vec<(i64, i64)> {
    s.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut split = line.split_whitespace();
            let x = split.next().unwrap().parse().unwrap();
            let y = split.next().unwrap().parse().unwrap();
            assert!(split.next().is_none());
            (x, y)
        })
        .collect()
}

impl TestCase {
    fn draw(&self) {
        let a = draw_one(&self.input).unwrap();
        let b = parse_pixels(&self.expected);
        assert_eq!(a, b);
    }

    fn draw_failure(&self) {
        let a = draw_one(&self.input).unwrap_err();
        assert_eq!(a.to_string(), self.expected.trim());
    }
}

pub fn read_tests(path: impl AsRef<Path>) -> Vec<TestCase> {
    let text = std::fs::read_to_string(path).unwrap();
    let mut ret = Vec::new();
    let mut in_input = true;
    let mut cur = TestCase::default();

    fn separator_line(line: &str, ch: u8) -> bool {
        line.trim().len() >= 2 && line.trim().bytes().all(|c| c == ch)
    }

    for line in text.split_inclusive('\n') {
        if in_input {
            if separator_line(line, b'-') {
                in_input = false;
            } else {
                cur.input += line;
            }
        } else if separator_line(line, b'=') {
            in_input = true;
            ret.push(std::mem::take(&mut cur));
        } else {
            cur.expected += line;
        }
    }
    ret
}

#[test]
fn drawing() {
    let tests = read_tests("tests/drawing.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.draw();
    }
}

#[test]
fn failures() {
    let tests = read_tests("tests/failures.txt");
    assert!(!tests.is_empty());
    for test in tests {
        test.draw_failure();
    }
}
