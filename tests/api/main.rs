mod health_check;
mod logout;
